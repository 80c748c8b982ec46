//! Health records and the mortality decrement.
//!
//! Recording a health event and taking its deaths off the batch head count
//! happen in one transaction. The decrement is conditional on enough live
//! birds, so concurrent mortality events can never push `current_count`
//! below zero.

use chrono::NaiveDate;
use coop_core::flock::{self, FlockError};
use coop_shared::{AppError, Money};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::common::{clean, flock_rule_error, now};
use super::production::{RecordFilter, scoped};
use crate::entities::{health_records, poultry_batches, sea_orm_active_enums::HealthRecordType};

/// Errors that can occur while recording health events.
#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    /// Description missing.
    #[error("Description is required")]
    MissingDescription,

    /// Mortality or cost rule failed.
    #[error(transparent)]
    Rule(#[from] FlockError),

    /// Referenced batch does not exist.
    #[error("Batch not found: {0}")]
    BatchNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<HealthError> for AppError {
    fn from(err: HealthError) -> Self {
        match &err {
            HealthError::MissingDescription => Self::Validation(err.to_string()),
            HealthError::Rule(rule) => flock_rule_error(rule),
            HealthError::BatchNotFound(_) => Self::NotFound(err.to_string()),
            HealthError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for a health event.
#[derive(Debug, Clone)]
pub struct RecordHealthInput {
    /// Affected batch.
    pub batch_id: Uuid,
    /// Event date.
    pub record_date: NaiveDate,
    /// Kind of event.
    pub record_type: HealthRecordType,
    /// What happened.
    pub description: String,
    /// Deaths, taken off the batch head count.
    pub mortality_count: i32,
    /// Cost of treatment.
    pub cost: Money,
    /// Vet or staff member who administered it.
    pub administered_by: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Acting user.
    pub recorded_by: Option<Uuid>,
}

/// A stored health event and the batch head count after it.
#[derive(Debug, Clone, Serialize)]
pub struct HealthEvent {
    /// The stored record.
    #[serde(flatten)]
    pub record: health_records::Model,
    /// Live birds left in the batch.
    pub batch_current_count: i32,
}

/// Health record repository.
#[derive(Debug, Clone)]
pub struct HealthRepository {
    db: DatabaseConnection,
}

impl HealthRepository {
    /// Creates a new health repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a health event and applies its mortality atomically.
    ///
    /// # Errors
    ///
    /// Returns `HealthError::Rule(FlockError::MortalityExceedsLiveCount)`
    /// when the batch has fewer live birds than the deaths recorded; nothing
    /// is written in that case.
    pub async fn record_health_event(
        &self,
        input: RecordHealthInput,
    ) -> Result<HealthEvent, HealthError> {
        let description = input.description.trim().to_string();
        if description.is_empty() {
            return Err(HealthError::MissingDescription);
        }
        flock::validate_mortality(input.mortality_count)?;
        flock::validate_cost(input.cost)?;

        let txn = self.db.begin().await?;

        let batch = poultry_batches::Entity::find_by_id(input.batch_id)
            .one(&txn)
            .await?
            .ok_or(HealthError::BatchNotFound(input.batch_id))?;
        flock::apply_mortality(batch.current_count, input.mortality_count)?;

        let record = health_records::ActiveModel {
            id: Set(Uuid::new_v4()),
            batch_id: Set(input.batch_id),
            record_date: Set(input.record_date),
            record_type: Set(input.record_type),
            description: Set(description),
            mortality_count: Set(input.mortality_count),
            cost: Set(input.cost.minor()),
            administered_by: Set(clean(input.administered_by)),
            notes: Set(clean(input.notes)),
            recorded_by: Set(input.recorded_by),
            created_at: Set(now()),
        };
        let (record, current_count) = write_health_event(&txn, record, batch.current_count).await?;

        txn.commit().await?;

        info!(
            record_id = %record.id,
            batch_id = %record.batch_id,
            mortality = record.mortality_count,
            current_count,
            "Health event recorded"
        );
        Ok(HealthEvent {
            record,
            batch_current_count: current_count,
        })
    }

    /// Lists health records, newest first.
    pub async fn list(
        &self,
        filter: RecordFilter,
    ) -> Result<Vec<health_records::Model>, HealthError> {
        let query = health_records::Entity::find()
            .order_by_desc(health_records::Column::RecordDate)
            .order_by_desc(health_records::Column::CreatedAt);
        let query = scoped(
            query,
            filter,
            health_records::Column::BatchId,
            health_records::Column::RecordDate,
        );
        Ok(query.all(&self.db).await?)
    }

    /// Deletes a health record. Recorded deaths stay off the head count.
    ///
    /// Returns `false` when the record did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool, HealthError> {
        let result = health_records::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

/// Inserts the record, then takes its deaths off the batch, on the caller's
/// transaction. Returns the stored record and the live count after it.
///
/// The decrement only applies while the batch still has enough birds. When
/// it matches no row the error is returned after the insert, so the caller
/// must roll back.
async fn write_health_event<C>(
    conn: &C,
    record: health_records::ActiveModel,
    current_count: i32,
) -> Result<(health_records::Model, i32), HealthError>
where
    C: ConnectionTrait,
{
    let record = record.insert(conn).await?;
    if record.mortality_count == 0 {
        return Ok((record, current_count));
    }

    let updated = poultry_batches::Entity::update_many()
        .col_expr(
            poultry_batches::Column::CurrentCount,
            Expr::col(poultry_batches::Column::CurrentCount).sub(record.mortality_count),
        )
        .col_expr(poultry_batches::Column::UpdatedAt, Expr::value(now()))
        .filter(poultry_batches::Column::Id.eq(record.batch_id))
        .filter(poultry_batches::Column::CurrentCount.gte(record.mortality_count))
        .exec(conn)
        .await?;

    // A concurrent event may have taken the birds since the caller's read.
    let after = poultry_batches::Entity::find_by_id(record.batch_id)
        .one(conn)
        .await?
        .ok_or(HealthError::BatchNotFound(record.batch_id))?;

    if updated.rows_affected == 0 {
        warn!(
            batch_id = %record.batch_id,
            requested = record.mortality_count,
            available = after.current_count,
            "Mortality refused"
        );
        return Err(FlockError::MortalityExceedsLiveCount {
            requested: record.mortality_count,
            available: after.current_count,
        }
        .into());
    }
    Ok((record, after.current_count))
}
