//! Expense routes.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use coop_db::{
    ExpenseRepository,
    entities::{
        expenses,
        sea_orm_active_enums::{ExpenseCategory, PaymentMethod},
    },
    repositories::{CreateExpenseInput, ExpenseFilter, UpdateExpenseInput},
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

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/{id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

/// Query parameters for listing expenses.
#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    /// Only this bucket.
    pub category: Option<ExpenseCategory>,
    /// Earliest expense date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest expense date, inclusive.
    pub to: Option<NaiveDate>,
    /// Page number (1-based).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for creating an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Date incurred.
    pub expense_date: NaiveDate,
    /// Bucket.
    pub category: ExpenseCategory,
    /// What was bought.
    pub description: String,
    /// Amount, in minor units.
    pub amount: Money,
    /// How it was paid.
    pub payment_method: Option<PaymentMethod>,
    /// Who was paid.
    pub vendor: Option<String>,
}

/// Request body for updating an expense.
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    /// Date incurred.
    pub expense_date: Option<NaiveDate>,
    /// Bucket.
    pub category: Option<ExpenseCategory>,
    /// What was bought.
    pub description: Option<String>,
    /// Amount, in minor units.
    pub amount: Option<Money>,
    /// How it was paid.
    pub payment_method: Option<PaymentMethod>,
    /// Who was paid.
    pub vendor: Option<String>,
}

async fn list_expenses(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(query): AppQuery<ListExpensesQuery>,
) -> ApiResult<AppJson<PageResponse<expenses::Model>>> {
    let filter = ExpenseFilter {
        category: query.category,
        from: query.from,
        to: query.to,
    };
    let page = ExpenseRepository::new(state.db())
        .list(filter, page_request(query.page, query.per_page))
        .await?;
    Ok(AppJson(page))
}

async fn create_expense(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    AppJson(payload): AppJson<CreateExpenseRequest>,
) -> ApiResult<impl IntoResponse> {
    let expense = ExpenseRepository::new(state.db())
        .create(CreateExpenseInput {
            expense_date: payload.expense_date,
            category: payload.category,
            description: payload.description,
            amount: payload.amount,
            payment_method: payload.payment_method,
            vendor: payload.vendor,
            recorded_by: Some(user.user_id()),
        })
        .await?;

    info!(expense_id = %expense.id, amount = expense.amount, "Expense recorded");
    Ok((StatusCode::CREATED, AppJson(expense)))
}

async fn get_expense(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<expenses::Model>> {
    ExpenseRepository::new(state.db())
        .find_by_id(id)
        .await?
        .map(AppJson)
        .ok_or_else(|| AppError::NotFound(format!("Expense {id} not found")).into())
}

async fn update_expense(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateExpenseRequest>,
) -> ApiResult<AppJson<expenses::Model>> {
    let expense = ExpenseRepository::new(state.db())
        .update(
            id,
            UpdateExpenseInput {
                expense_date: payload.expense_date,
                category: payload.category,
                description: payload.description,
                amount: payload.amount,
                payment_method: payload.payment_method,
                vendor: payload.vendor,
            },
        )
        .await?;
    Ok(AppJson(expense))
}

async fn delete_expense(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ExpenseRepository::new(state.db()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
