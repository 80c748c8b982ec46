//! Sales routes. Every write moves the buyer's purchase ledger with it.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use chrono::NaiveDate;
use coop_db::{
    SaleRepository,
    entities::{
        sales,
        sea_orm_active_enums::{PaymentMethod, PaymentStatus, SaleType},
    },
    repositories::{RecordSaleInput, SaleFilter, UpdateSalePaymentInput},
};
use coop_shared::{AppError, Money, PageResponse};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::page_request;
use crate::{
    AppState,
    error::ApiResult,
    extractors::{AppJson, AppQuery},
    middleware::{AdminUser, StaffUser},
};

/// Creates the sales routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(record_sale))
        .route("/sales/{id}", get(get_sale).delete(delete_sale))
        .route("/sales/{id}/payment", patch(update_payment))
}

/// Query parameters for listing sales.
#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    /// Only this buyer's sales.
    pub customer_id: Option<Uuid>,
    /// Only sales in this settlement state.
    pub payment_status: Option<PaymentStatus>,
    /// Earliest sale date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest sale date, inclusive.
    pub to: Option<NaiveDate>,
    /// Page number (1-based).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for recording a sale.
#[derive(Debug, Deserialize)]
pub struct RecordSaleRequest {
    /// Buyer.
    pub customer_id: Uuid,
    /// Date of sale.
    pub sale_date: NaiveDate,
    /// What was sold.
    pub sale_type: SaleType,
    /// Units sold.
    pub quantity: i32,
    /// Price per unit, in minor units.
    pub unit_price: Money,
    /// Settlement state (defaults to pending).
    pub payment_status: Option<PaymentStatus>,
    /// How it was paid.
    pub payment_method: Option<PaymentMethod>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for a payment update.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    /// New settlement state.
    pub payment_status: Option<PaymentStatus>,
    /// How it was paid.
    pub payment_method: Option<PaymentMethod>,
    /// Free-form notes.
    pub notes: Option<String>,
}

async fn list_sales(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(query): AppQuery<ListSalesQuery>,
) -> ApiResult<AppJson<PageResponse<sales::Model>>> {
    let filter = SaleFilter {
        customer_id: query.customer_id,
        payment_status: query.payment_status,
        from: query.from,
        to: query.to,
    };
    let page = SaleRepository::new(state.db())
        .list(filter, page_request(query.page, query.per_page))
        .await?;
    Ok(AppJson(page))
}

/// POST /sales - Record a sale and add its total to the buyer's ledger.
async fn record_sale(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    AppJson(payload): AppJson<RecordSaleRequest>,
) -> ApiResult<impl IntoResponse> {
    let sale = SaleRepository::new(state.db())
        .record_sale(RecordSaleInput {
            customer_id: payload.customer_id,
            sale_date: payload.sale_date,
            sale_type: payload.sale_type,
            quantity: payload.quantity,
            unit_price: payload.unit_price,
            payment_status: payload.payment_status,
            payment_method: payload.payment_method,
            notes: payload.notes,
            recorded_by: Some(user.user_id()),
        })
        .await?;

    info!(
        sale_id = %sale.id,
        customer_id = %sale.customer_id,
        total = sale.total_amount,
        "Sale recorded"
    );
    Ok((StatusCode::CREATED, AppJson(sale)))
}

async fn get_sale(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<sales::Model>> {
    SaleRepository::new(state.db())
        .find_by_id(id)
        .await?
        .map(AppJson)
        .ok_or_else(|| AppError::NotFound(format!("Sale {id} not found")).into())
}

/// PATCH /sales/{id}/payment - Settlement fields only; amounts are immutable.
async fn update_payment(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdatePaymentRequest>,
) -> ApiResult<AppJson<sales::Model>> {
    let sale = SaleRepository::new(state.db())
        .update_payment(
            id,
            UpdateSalePaymentInput {
                payment_status: payload.payment_status,
                payment_method: payload.payment_method,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(AppJson(sale))
}

/// DELETE /sales/{id} - Remove the sale and take its total back off the ledger.
async fn delete_sale(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = SaleRepository::new(state.db()).delete_sale(id).await?;
    if removed {
        info!(sale_id = %id, deleted_by = %admin.user_id(), "Sale deleted and ledger reversed");
    }
    Ok(StatusCode::NO_CONTENT)
}
