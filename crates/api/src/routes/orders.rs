//! Storefront orders and their fulfilment workflow.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use coop_core::orders::OrderItemRequest;
use coop_db::{
    OrderRepository,
    entities::{orders, sea_orm_active_enums::OrderStatus},
    repositories::{OrderWithItems, PlaceOrderInput},
};
use coop_shared::{AppError, PageResponse};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::page_request;
use crate::{
    AppState,
    error::ApiResult,
    extractors::{AppJson, AppQuery},
    middleware::{AdminUser, StaffUser},
    notifications::notify_in_background,
};

/// Creates the order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(place_order))
        .route("/orders/{id}", get(get_order).delete(delete_order))
        .route("/orders/{id}/status", patch(update_status))
}

/// Request body for placing an order from the storefront.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    /// Contact name.
    pub customer_name: String,
    /// Contact phone.
    pub customer_phone: String,
    /// Contact email.
    pub customer_email: Option<String>,
    /// Where to deliver.
    pub delivery_address: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Order lines.
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

/// Query parameters for listing orders.
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    /// Only orders in this status.
    pub status: Option<OrderStatus>,
    /// Page number (1-based).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status name.
    pub status: String,
}

/// POST /orders - Place an order. No account needed.
///
/// The operator notification is sent after the order is stored and never
/// affects the response.
async fn place_order(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PlaceOrderRequest>,
) -> ApiResult<impl IntoResponse> {
    let placed = OrderRepository::new(state.db())
        .place_order(
            PlaceOrderInput {
                customer_name: payload.customer_name,
                customer_phone: payload.customer_phone,
                customer_email: payload.customer_email,
                delivery_address: payload.delivery_address,
                notes: payload.notes,
                items: payload.items,
            },
            &*state.order_numbers,
        )
        .await?;

    notify_in_background(state.notifier.clone(), placed.notice);
    Ok((StatusCode::CREATED, AppJson(placed.order)))
}

async fn list_orders(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(query): AppQuery<ListOrdersQuery>,
) -> ApiResult<AppJson<PageResponse<orders::Model>>> {
    let page = OrderRepository::new(state.db())
        .list(query.status, page_request(query.page, query.per_page))
        .await?;
    Ok(AppJson(page))
}

async fn get_order(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<OrderWithItems>> {
    OrderRepository::new(state.db())
        .find_by_id(id)
        .await?
        .map(AppJson)
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")).into())
}

/// PATCH /orders/{id}/status - Advance or cancel an order.
async fn update_status(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> ApiResult<AppJson<orders::Model>> {
    let order = OrderRepository::new(state.db())
        .update_status(id, &payload.status)
        .await?;
    info!(order_id = %id, status = ?order.status, changed_by = %user.user_id(), "Order status updated");
    Ok(AppJson(order))
}

async fn delete_order(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = OrderRepository::new(state.db()).delete(id).await?;
    if removed {
        info!(order_id = %id, deleted_by = %admin.user_id(), "Order deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}
