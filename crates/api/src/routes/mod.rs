//! API route definitions.
//!
//! Access levels: public routes take no auth extractor, back-office routes
//! take [`StaffUser`](crate::middleware::StaffUser) and destructive or
//! configuration routes take [`AdminUser`](crate::middleware::AdminUser).

use axum::Router;
use coop_shared::PageRequest;

use crate::AppState;

pub mod auth;
pub mod batches;
pub mod customers;
pub mod dashboard;
pub mod expenses;
pub mod health;
pub mod health_records;
pub mod orders;
pub mod production;
pub mod sales;
pub mod settings;
pub mod users;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(users::routes())
        .merge(customers::routes())
        .merge(batches::routes())
        .merge(production::routes())
        .merge(health_records::routes())
        .merge(sales::routes())
        .merge(expenses::routes())
        .merge(orders::routes())
        .merge(settings::routes())
        .merge(dashboard::routes())
}

/// Page parameters from a query string, with defaults.
pub(crate) fn page_request(page: Option<u32>, per_page: Option<u32>) -> PageRequest {
    let defaults = PageRequest::default();
    PageRequest {
        page: page.unwrap_or(defaults.page),
        per_page: per_page.unwrap_or(defaults.per_page),
    }
}
