//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware and role extractors
//! - Error responses
//! - Order notifications

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod notifications;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use coop_core::orders::{OrderNumberSource, TimestampOrderNumbers};
use coop_shared::{AppConfig, EmailService, JwtService};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::notifications::{EmailOrderNotifier, OrderNotifier};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// New-order notifications.
    pub notifier: Arc<dyn OrderNotifier>,
    /// Order-number generator.
    pub order_numbers: Arc<dyn OrderNumberSource>,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Builds the state from a connection and configuration.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let jwt_service = JwtService::new((&config.jwt).into());
        let notifier = EmailOrderNotifier::new(
            EmailService::new(config.email.clone()),
            config.business.clone(),
        );
        let order_numbers = TimestampOrderNumbers::new(config.business.order_prefix.clone());

        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            notifier: Arc::new(notifier),
            order_numbers: Arc::new(order_numbers),
            config: Arc::new(config),
        }
    }

    /// Replaces the order notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn OrderNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// A handle to the connection pool for a repository.
    #[must_use]
    pub fn db(&self) -> DatabaseConnection {
        (*self.db).clone()
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    if state.config.server.expose_internal_errors {
        router = router.layer(axum::middleware::from_fn(error::expose_internal_errors));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
