//! Poultry batch routes.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use coop_db::{
    BatchRepository,
    entities::{
        poultry_batches,
        sea_orm_active_enums::{BatchStatus, BirdType},
    },
    repositories::{CreateBatchInput, UpdateBatchInput},
};
use coop_shared::{AppError, Money};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiResult,
    extractors::{AppJson, AppQuery},
    middleware::{AdminUser, StaffUser},
};

/// Creates the batch routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/batches", get(list_batches).post(create_batch))
        .route(
            "/batches/{id}",
            get(get_batch).put(update_batch).delete(delete_batch),
        )
}

/// Query parameters for listing batches.
#[derive(Debug, Deserialize)]
pub struct ListBatchesQuery {
    /// Only batches in this state.
    pub status: Option<BatchStatus>,
}

/// Request body for creating a batch.
#[derive(Debug, Deserialize)]
pub struct CreateBatchRequest {
    /// Display name.
    pub batch_name: String,
    /// Breed.
    pub breed: Option<String>,
    /// Purpose of the flock.
    pub bird_type: BirdType,
    /// Birds at acquisition.
    pub initial_count: i32,
    /// Date the birds arrived.
    pub acquisition_date: NaiveDate,
    /// Purchase cost, in minor units.
    #[serde(default)]
    pub acquisition_cost: Money,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating a batch.
#[derive(Debug, Deserialize)]
pub struct UpdateBatchRequest {
    /// Display name.
    pub batch_name: Option<String>,
    /// Breed.
    pub breed: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Head-count correction.
    pub current_count: Option<i32>,
    /// Lifecycle state.
    pub status: Option<BatchStatus>,
}

async fn list_batches(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(query): AppQuery<ListBatchesQuery>,
) -> ApiResult<AppJson<Vec<poultry_batches::Model>>> {
    let batches = BatchRepository::new(state.db()).list(query.status).await?;
    Ok(AppJson(batches))
}

async fn create_batch(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    AppJson(payload): AppJson<CreateBatchRequest>,
) -> ApiResult<impl IntoResponse> {
    let batch = BatchRepository::new(state.db())
        .create(CreateBatchInput {
            batch_name: payload.batch_name,
            breed: payload.breed,
            bird_type: payload.bird_type,
            initial_count: payload.initial_count,
            acquisition_date: payload.acquisition_date,
            acquisition_cost: payload.acquisition_cost,
            notes: payload.notes,
            created_by: Some(user.user_id()),
        })
        .await?;

    info!(batch_id = %batch.id, birds = batch.initial_count, "Batch created");
    Ok((StatusCode::CREATED, AppJson(batch)))
}

async fn get_batch(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
) -> ApiResult<AppJson<poultry_batches::Model>> {
    BatchRepository::new(state.db())
        .find_by_id(id)
        .await?
        .map(AppJson)
        .ok_or_else(|| AppError::NotFound(format!("Batch {id} not found")).into())
}

async fn update_batch(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateBatchRequest>,
) -> ApiResult<AppJson<poultry_batches::Model>> {
    let batch = BatchRepository::new(state.db())
        .update(
            id,
            UpdateBatchInput {
                batch_name: payload.batch_name,
                breed: payload.breed,
                notes: payload.notes,
                current_count: payload.current_count,
                status: payload.status,
            },
        )
        .await?;
    Ok(AppJson(batch))
}

async fn delete_batch(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = BatchRepository::new(state.db()).delete(id).await?;
    if removed {
        info!(batch_id = %id, deleted_by = %admin.user_id(), "Batch deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}
