//! Customer routes.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use coop_db::{
    CustomerRepository,
    entities::{customers, sea_orm_active_enums::CustomerType},
    repositories::{CreateCustomerInput, CustomerFilter, UpdateCustomerInput},
};
use coop_shared::{AppError, PageResponse};
use serde::{Deserialize, Deserializer};
use tracing::info;
use uuid::Uuid;

use super::page_request;
use crate::{
    AppState,
    error::ApiResult,
    extractors::{AppJson, AppQuery},
    middleware::{AdminUser, StaffUser},
};

/// Creates the customer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// Query parameters for listing customers.
#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    /// Case-insensitive match on name, email or phone.
    pub search: Option<String>,
    /// Only this kind of buyer.
    pub customer_type: Option<CustomerType>,
    /// Page number (1-based).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for creating a customer.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal or delivery address.
    pub address: Option<String>,
    /// Kind of buyer (defaults to individual).
    pub customer_type: Option<CustomerType>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating a customer. Absent fields are left alone; an
/// explicit `null` clears an optional contact field.
#[derive(Debug, Deserialize)]
#[allow(clippy::option_option)]
pub struct UpdateCustomerRequest {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    /// Phone number.
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    /// Postal or delivery address.
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
    /// Kind of buyer.
    pub customer_type: Option<CustomerType>,
    /// Free-form notes.
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    /// Manual ledger correction, in minor units.
    pub total_purchases: Option<i64>,
}

/// Marks a field as present, keeping `null` distinct from absent.
#[allow(clippy::option_option)]
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

async fn list_customers(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(query): AppQuery<ListCustomersQuery>,
) -> ApiResult<AppJson<PageResponse<customers::Model>>> {
    let filter = CustomerFilter {
        search: query.search,
        customer_type: query.customer_type,
    };
    let page = CustomerRepository::new(state.db())
        .list(filter, page_request(query.page, query.per_page))
        .await?;
    Ok(AppJson(page))
}

async fn create_customer(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    AppJson(payload): AppJson<CreateCustomerRequest>,
) -> ApiResult<impl IntoResponse> {
    let customer = CustomerRepository::new(state.db())
        .create(CreateCustomerInput {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
            customer_type: payload.customer_type,
            notes: payload.notes,
        })
        .await?;

    info!(customer_id = %customer.id, created_by = %user.user_id(), "Customer created");
    Ok((StatusCode::CREATED, AppJson(customer)))
}

async fn get_customer(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<customers::Model>> {
    CustomerRepository::new(state.db())
        .find_by_id(id)
        .await?
        .map(AppJson)
        .ok_or_else(|| AppError::NotFound(format!("Customer {id} not found")).into())
}

async fn update_customer(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateCustomerRequest>,
) -> ApiResult<AppJson<customers::Model>> {
    if let Some(total) = payload.total_purchases {
        info!(customer_id = %id, total_purchases = total, "Manual purchase-ledger correction");
    }
    let customer = CustomerRepository::new(state.db())
        .update(
            id,
            UpdateCustomerInput {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
                address: payload.address,
                customer_type: payload.customer_type,
                notes: payload.notes,
                total_purchases: payload.total_purchases,
            },
        )
        .await?;
    Ok(AppJson(customer))
}

async fn delete_customer(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = CustomerRepository::new(state.db()).delete(id).await?;
    if removed {
        info!(customer_id = %id, deleted_by = %admin.user_id(), "Customer deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}
