//! Operator notification text for new orders.

use std::fmt::Write as _;

use coop_shared::Money;

use crate::orders::types::PricedItem;

/// Everything the operator needs to act on a newly placed order.
#[derive(Debug, Clone)]
pub struct OrderNotice {
    /// Assigned order number.
    pub order_number: String,
    /// Customer name.
    pub customer_name: String,
    /// Customer phone.
    pub customer_phone: String,
    /// Customer email, if given.
    pub customer_email: Option<String>,
    /// Delivery address, if given.
    pub delivery_address: Option<String>,
    /// Free-form notes, if given.
    pub notes: Option<String>,
    /// Item snapshot.
    pub items: Vec<PricedItem>,
    /// Order total.
    pub total_amount: Money,
}

impl OrderNotice {
    /// Email subject line.
    #[must_use]
    pub fn subject(&self, business_name: &str) -> String {
        format!(
            "[{business_name}] New order {} from {}",
            self.order_number, self.customer_name
        )
    }

    /// Plain-text body listing the customer and every line.
    #[must_use]
    pub fn body(&self, currency: &str) -> String {
        let mut body = String::new();
        let _ = writeln!(body, "Order: {}", self.order_number);
        let _ = writeln!(body, "Customer: {}", self.customer_name);
        let _ = writeln!(body, "Phone: {}", self.customer_phone);
        if let Some(email) = &self.customer_email {
            let _ = writeln!(body, "Email: {email}");
        }
        if let Some(address) = &self.delivery_address {
            let _ = writeln!(body, "Deliver to: {address}");
        }

        body.push_str("\nItems:\n");
        for item in &self.items {
            let _ = writeln!(
                body,
                "  {} x {} {} @ {currency} {} = {currency} {}",
                item.quantity, item.product, item.unit, item.unit_price, item.line_total
            );
        }
        let _ = writeln!(body, "\nTotal: {currency} {}", self.total_amount);

        if let Some(notes) = &self.notes {
            let _ = writeln!(body, "\nNotes: {notes}");
        }
        body
    }
}
