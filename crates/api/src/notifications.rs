//! Operator notifications for new storefront orders.
//!
//! Delivery happens after the order has been committed and never affects
//! the placement response.

use std::sync::Arc;

use async_trait::async_trait;
use coop_core::orders::OrderNotice;
use coop_shared::{BusinessConfig, EmailError, EmailService};
use tracing::{info, warn};

/// Sends "new order" notifications.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Delivers a notice for a committed order.
    async fn order_placed(&self, notice: &OrderNotice) -> Result<(), EmailError>;
}

/// E-mails the farm operator.
#[derive(Debug)]
pub struct EmailOrderNotifier {
    email: EmailService,
    business: BusinessConfig,
}

impl EmailOrderNotifier {
    /// Creates a notifier sending to `business.notify_email`.
    #[must_use]
    pub const fn new(email: EmailService, business: BusinessConfig) -> Self {
        Self { email, business }
    }
}

#[async_trait]
impl OrderNotifier for EmailOrderNotifier {
    async fn order_placed(&self, notice: &OrderNotice) -> Result<(), EmailError> {
        let Some(to) = self.business.notify_email.as_deref() else {
            return Ok(());
        };
        self.email
            .send_email(
                to,
                &notice.subject(&self.business.name),
                &notice.body(&self.business.currency),
            )
            .await
    }
}

/// Discards notifications.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl OrderNotifier for NoopNotifier {
    async fn order_placed(&self, _notice: &OrderNotice) -> Result<(), EmailError> {
        Ok(())
    }
}

/// Sends the notice on a detached task; failures are logged and dropped.
pub fn notify_in_background(notifier: Arc<dyn OrderNotifier>, notice: OrderNotice) {
    tokio::spawn(async move {
        match notifier.order_placed(&notice).await {
            Ok(()) => info!(order_number = %notice.order_number, "Order notification sent"),
            Err(EmailError::Disabled) => {}
            Err(e) => warn!(
                order_number = %notice.order_number,
                error = %e,
                "Order notification failed"
            ),
        }
    });
}
