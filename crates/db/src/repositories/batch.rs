//! Poultry batch repository.
//!
//! `current_count` starts at `initial_count` and afterwards only moves
//! through recorded mortality (`health.rs`) or an explicit correction here.

use chrono::NaiveDate;
use coop_core::flock::{self, FlockError};
use coop_shared::{AppError, Money};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::common::{clean, flock_rule_error, now};
use crate::entities::{
    egg_production, feed_records, health_records, poultry_batches,
    sea_orm_active_enums::{BatchStatus, BirdType},
};

/// Errors that can occur during batch operations.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Batch name missing.
    #[error("Batch name is required")]
    MissingName,

    /// Head count or cost rule failed.
    #[error(transparent)]
    Rule(#[from] FlockError),

    /// Batch not found.
    #[error("Batch not found: {0}")]
    NotFound(Uuid),

    /// Egg, feed or health records still reference the batch.
    #[error("Batch {id} has {records} dependent record(s); delete them first")]
    HasRecords {
        /// Batch ID.
        id: Uuid,
        /// Number of dependent records.
        records: u64,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        match &err {
            BatchError::MissingName => Self::Validation(err.to_string()),
            BatchError::Rule(rule) => flock_rule_error(rule),
            BatchError::NotFound(_) => Self::NotFound(err.to_string()),
            BatchError::HasRecords { .. } => Self::Conflict(err.to_string()),
            BatchError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for creating a batch.
#[derive(Debug, Clone)]
pub struct CreateBatchInput {
    /// Display name.
    pub batch_name: String,
    /// Breed.
    pub breed: Option<String>,
    /// Layer, broiler or dual purpose.
    pub bird_type: BirdType,
    /// Birds acquired.
    pub initial_count: i32,
    /// Date the birds arrived.
    pub acquisition_date: NaiveDate,
    /// Purchase cost.
    pub acquisition_cost: Money,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Acting user.
    pub created_by: Option<Uuid>,
}

/// Input for updating a batch. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateBatchInput {
    /// New name.
    pub batch_name: Option<String>,
    /// New breed.
    pub breed: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// Administrative head-count correction.
    pub current_count: Option<i32>,
    /// New lifecycle status.
    pub status: Option<BatchStatus>,
}

/// Batch repository.
#[derive(Debug, Clone)]
pub struct BatchRepository {
    db: DatabaseConnection,
}

impl BatchRepository {
    /// Creates a new batch repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an active batch with `current_count = initial_count`.
    pub async fn create(&self, input: CreateBatchInput) -> Result<poultry_batches::Model, BatchError> {
        let batch_name = input.batch_name.trim().to_string();
        if batch_name.is_empty() {
            return Err(BatchError::MissingName);
        }
        flock::validate_initial_count(input.initial_count)?;
        flock::validate_cost(input.acquisition_cost)?;

        let now = now();
        let batch = poultry_batches::ActiveModel {
            id: Set(Uuid::new_v4()),
            batch_name: Set(batch_name),
            breed: Set(clean(input.breed)),
            bird_type: Set(input.bird_type),
            initial_count: Set(input.initial_count),
            current_count: Set(input.initial_count),
            acquisition_date: Set(input.acquisition_date),
            acquisition_cost: Set(input.acquisition_cost.minor()),
            status: Set(BatchStatus::Active),
            notes: Set(clean(input.notes)),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(
            batch_id = %batch.id,
            initial_count = batch.initial_count,
            "Batch created"
        );
        Ok(batch)
    }

    /// Lists batches, newest acquisition first.
    pub async fn list(
        &self,
        status: Option<BatchStatus>,
    ) -> Result<Vec<poultry_batches::Model>, BatchError> {
        let mut query = poultry_batches::Entity::find()
            .order_by_desc(poultry_batches::Column::AcquisitionDate)
            .order_by_asc(poultry_batches::Column::BatchName);
        if let Some(status) = status {
            query = query.filter(poultry_batches::Column::Status.eq(status));
        }
        Ok(query.all(&self.db).await?)
    }

    /// Finds a batch by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<poultry_batches::Model>, BatchError> {
        Ok(poultry_batches::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Updates descriptive fields, status, or corrects the head count.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateBatchInput,
    ) -> Result<poultry_batches::Model, BatchError> {
        let existing = poultry_batches::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(BatchError::NotFound(id))?;

        let mut active: poultry_batches::ActiveModel = existing.into();
        if let Some(name) = input.batch_name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(BatchError::MissingName);
            }
            active.batch_name = Set(name);
        }
        if let Some(breed) = input.breed {
            active.breed = Set(clean(Some(breed)));
        }
        if let Some(notes) = input.notes {
            active.notes = Set(clean(Some(notes)));
        }
        if let Some(count) = input.current_count {
            flock::validate_count_correction(count)?;
            info!(batch_id = %id, current_count = count, "Batch head count corrected");
            active.current_count = Set(count);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a batch that has no egg, feed or health records.
    ///
    /// Returns `false` when the batch did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool, BatchError> {
        let txn = self.db.begin().await?;

        if poultry_batches::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(false);
        }

        let eggs = egg_production::Entity::find()
            .filter(egg_production::Column::BatchId.eq(id))
            .count(&txn)
            .await?;
        let feed = feed_records::Entity::find()
            .filter(feed_records::Column::BatchId.eq(id))
            .count(&txn)
            .await?;
        let health = health_records::Entity::find()
            .filter(health_records::Column::BatchId.eq(id))
            .count(&txn)
            .await?;

        let records = eggs + feed + health;
        if records > 0 {
            return Err(BatchError::HasRecords { id, records });
        }

        poultry_batches::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(batch_id = %id, "Batch deleted");
        Ok(true)
    }
}
