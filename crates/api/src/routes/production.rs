//! Egg collection and feed consumption records.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::NaiveDate;
use coop_db::{
    ProductionRepository,
    entities::{egg_production, feed_records},
    repositories::{CreateEggRecordInput, CreateFeedRecordInput, RecordFilter},
};
use coop_shared::Money;
use sea_orm::prelude::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiResult,
    extractors::{AppJson, AppQuery},
    middleware::{AdminUser, StaffUser},
};

/// Creates the production routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/egg-production", get(list_eggs).post(record_eggs))
        .route("/egg-production/{id}", delete(delete_eggs))
        .route("/feed-records", get(list_feed).post(record_feed))
        .route("/feed-records/{id}", delete(delete_feed))
}

/// Filters shared by the per-batch record listings.
#[derive(Debug, Default, Deserialize)]
pub struct RecordQuery {
    /// Only records for this batch.
    pub batch_id: Option<Uuid>,
    /// Earliest record date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest record date, inclusive.
    pub to: Option<NaiveDate>,
}

impl From<RecordQuery> for RecordFilter {
    fn from(query: RecordQuery) -> Self {
        Self {
            batch_id: query.batch_id,
            from: query.from,
            to: query.to,
        }
    }
}

/// Request body for a daily egg collection.
#[derive(Debug, Deserialize)]
pub struct RecordEggsRequest {
    /// Batch the eggs came from.
    pub batch_id: Uuid,
    /// Collection date.
    pub record_date: NaiveDate,
    /// Eggs collected, including broken ones.
    pub eggs_collected: i32,
    /// Eggs broken.
    #[serde(default)]
    pub broken_eggs: i32,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for a feed record.
#[derive(Debug, Deserialize)]
pub struct RecordFeedRequest {
    /// Batch that was fed.
    pub batch_id: Uuid,
    /// Feeding date.
    pub record_date: NaiveDate,
    /// Feed name, e.g. layers mash.
    pub feed_type: String,
    /// Kilograms consumed.
    pub quantity_kg: Decimal,
    /// Cost, in minor units.
    #[serde(default)]
    pub cost: Money,
    /// Supplier.
    pub supplier: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

async fn list_eggs(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(query): AppQuery<RecordQuery>,
) -> ApiResult<AppJson<Vec<egg_production::Model>>> {
    let records = ProductionRepository::new(state.db())
        .list_eggs(query.into())
        .await?;
    Ok(AppJson(records))
}

async fn record_eggs(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    AppJson(payload): AppJson<RecordEggsRequest>,
) -> ApiResult<impl IntoResponse> {
    let record = ProductionRepository::new(state.db())
        .record_eggs(CreateEggRecordInput {
            batch_id: payload.batch_id,
            record_date: payload.record_date,
            eggs_collected: payload.eggs_collected,
            broken_eggs: payload.broken_eggs,
            notes: payload.notes,
            recorded_by: Some(user.user_id()),
        })
        .await?;

    info!(
        batch_id = %record.batch_id,
        eggs = record.eggs_collected,
        "Egg collection recorded"
    );
    Ok((StatusCode::CREATED, AppJson(record)))
}

async fn delete_eggs(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ProductionRepository::new(state.db()).delete_eggs(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_feed(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(query): AppQuery<RecordQuery>,
) -> ApiResult<AppJson<Vec<feed_records::Model>>> {
    let records = ProductionRepository::new(state.db())
        .list_feed(query.into())
        .await?;
    Ok(AppJson(records))
}

async fn record_feed(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    AppJson(payload): AppJson<RecordFeedRequest>,
) -> ApiResult<impl IntoResponse> {
    let record = ProductionRepository::new(state.db())
        .record_feed(CreateFeedRecordInput {
            batch_id: payload.batch_id,
            record_date: payload.record_date,
            feed_type: payload.feed_type,
            quantity_kg: payload.quantity_kg,
            cost: payload.cost,
            supplier: payload.supplier,
            notes: payload.notes,
            recorded_by: Some(user.user_id()),
        })
        .await?;

    info!(batch_id = %record.batch_id, "Feed consumption recorded");
    Ok((StatusCode::CREATED, AppJson(record)))
}

async fn delete_feed(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ProductionRepository::new(state.db()).delete_feed(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
