//! Health events: vaccinations, treatments and mortality.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::NaiveDate;
use coop_db::{
    HealthRepository,
    entities::{health_records, sea_orm_active_enums::HealthRecordType},
    repositories::RecordHealthInput,
};
use coop_shared::Money;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::production::RecordQuery;
use crate::{
    AppState,
    error::ApiResult,
    extractors::{AppJson, AppQuery},
    middleware::{AdminUser, StaffUser},
};

/// Creates the health record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health-records", get(list_records).post(record_event))
        .route("/health-records/{id}", delete(delete_record))
}

/// Request body for a health event.
#[derive(Debug, Deserialize)]
pub struct RecordHealthRequest {
    /// Affected batch.
    pub batch_id: Uuid,
    /// Date of the event.
    pub record_date: NaiveDate,
    /// Kind of event.
    pub record_type: HealthRecordType,
    /// What happened.
    pub description: String,
    /// Birds that died.
    #[serde(default)]
    pub mortality_count: i32,
    /// Cost, in minor units.
    #[serde(default)]
    pub cost: Money,
    /// Vet or staff member.
    pub administered_by: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

async fn list_records(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(query): AppQuery<RecordQuery>,
) -> ApiResult<AppJson<Vec<health_records::Model>>> {
    let records = HealthRepository::new(state.db()).list(query.into()).await?;
    Ok(AppJson(records))
}

/// POST /health-records - Record an event; mortality reduces the live count.
async fn record_event(
    State(state): State<AppState>,
    StaffUser(user): StaffUser,
    AppJson(payload): AppJson<RecordHealthRequest>,
) -> ApiResult<impl IntoResponse> {
    let event = HealthRepository::new(state.db())
        .record_health_event(RecordHealthInput {
            batch_id: payload.batch_id,
            record_date: payload.record_date,
            record_type: payload.record_type,
            description: payload.description,
            mortality_count: payload.mortality_count,
            cost: payload.cost,
            administered_by: payload.administered_by,
            notes: payload.notes,
            recorded_by: Some(user.user_id()),
        })
        .await?;

    if event.record.mortality_count > 0 {
        warn!(
            batch_id = %event.record.batch_id,
            deaths = event.record.mortality_count,
            remaining = event.batch_current_count,
            "Mortality recorded"
        );
    } else {
        info!(batch_id = %event.record.batch_id, "Health event recorded");
    }
    Ok((StatusCode::CREATED, AppJson(event)))
}

/// DELETE /health-records/{id} - Remove the record; the live count is not restored.
async fn delete_record(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    HealthRepository::new(state.db()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
