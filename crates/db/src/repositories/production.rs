//! Egg collection and feed usage records.

use chrono::NaiveDate;
use coop_core::flock::{self, FlockError};
use coop_shared::{AppError, Money};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use tracing::info;
use uuid::Uuid;

use super::common::{clean, flock_rule_error, now};
use crate::entities::{egg_production, feed_records, poultry_batches};

/// Errors that can occur while recording production.
#[derive(Debug, thiserror::Error)]
pub enum ProductionError {
    /// Count, quantity or cost rule failed.
    #[error(transparent)]
    Rule(#[from] FlockError),

    /// Feed type missing.
    #[error("Feed type is required")]
    MissingFeedType,

    /// Referenced batch does not exist.
    #[error("Batch not found: {0}")]
    BatchNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProductionError> for AppError {
    fn from(err: ProductionError) -> Self {
        match &err {
            ProductionError::Rule(rule) => flock_rule_error(rule),
            ProductionError::MissingFeedType => Self::Validation(err.to_string()),
            ProductionError::BatchNotFound(_) => Self::NotFound(err.to_string()),
            ProductionError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for an egg collection record.
#[derive(Debug, Clone)]
pub struct CreateEggRecordInput {
    /// Batch the eggs came from.
    pub batch_id: Uuid,
    /// Collection date.
    pub record_date: NaiveDate,
    /// Eggs collected.
    pub eggs_collected: i32,
    /// Eggs broken, at most `eggs_collected`.
    pub broken_eggs: i32,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Acting user.
    pub recorded_by: Option<Uuid>,
}

/// Input for a feed usage record.
#[derive(Debug, Clone)]
pub struct CreateFeedRecordInput {
    /// Batch that was fed.
    pub batch_id: Uuid,
    /// Date of use.
    pub record_date: NaiveDate,
    /// Feed name, e.g. "layers mash".
    pub feed_type: String,
    /// Kilograms used.
    pub quantity_kg: Decimal,
    /// Cost of the feed.
    pub cost: Money,
    /// Supplier.
    pub supplier: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Acting user.
    pub recorded_by: Option<Uuid>,
}

/// Filter for batch-scoped record lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFilter {
    /// Only this batch.
    pub batch_id: Option<Uuid>,
    /// On or after this date.
    pub from: Option<NaiveDate>,
    /// On or before this date.
    pub to: Option<NaiveDate>,
}

/// Repository for egg and feed records.
#[derive(Debug, Clone)]
pub struct ProductionRepository {
    db: DatabaseConnection,
}

impl ProductionRepository {
    /// Creates a new production repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an egg collection.
    pub async fn record_eggs(
        &self,
        input: CreateEggRecordInput,
    ) -> Result<egg_production::Model, ProductionError> {
        flock::validate_egg_collection(input.eggs_collected, input.broken_eggs)?;
        self.ensure_batch(input.batch_id).await?;

        let record = egg_production::ActiveModel {
            id: Set(Uuid::new_v4()),
            batch_id: Set(input.batch_id),
            record_date: Set(input.record_date),
            eggs_collected: Set(input.eggs_collected),
            broken_eggs: Set(input.broken_eggs),
            notes: Set(clean(input.notes)),
            recorded_by: Set(input.recorded_by),
            created_at: Set(now()),
        }
        .insert(&self.db)
        .await?;

        info!(
            record_id = %record.id,
            batch_id = %record.batch_id,
            eggs = record.eggs_collected,
            "Egg collection recorded"
        );
        Ok(record)
    }

    /// Lists egg records, newest first.
    pub async fn list_eggs(
        &self,
        filter: RecordFilter,
    ) -> Result<Vec<egg_production::Model>, ProductionError> {
        let mut query = egg_production::Entity::find()
            .order_by_desc(egg_production::Column::RecordDate)
            .order_by_desc(egg_production::Column::CreatedAt);
        query = scoped(
            query,
            filter,
            egg_production::Column::BatchId,
            egg_production::Column::RecordDate,
        );
        Ok(query.all(&self.db).await?)
    }

    /// Deletes an egg record. Returns `false` when it did not exist.
    pub async fn delete_eggs(&self, id: Uuid) -> Result<bool, ProductionError> {
        let result = egg_production::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Records feed usage.
    pub async fn record_feed(
        &self,
        input: CreateFeedRecordInput,
    ) -> Result<feed_records::Model, ProductionError> {
        let feed_type = input.feed_type.trim().to_string();
        if feed_type.is_empty() {
            return Err(ProductionError::MissingFeedType);
        }
        flock::validate_feed(input.quantity_kg, input.cost)?;
        self.ensure_batch(input.batch_id).await?;

        let record = feed_records::ActiveModel {
            id: Set(Uuid::new_v4()),
            batch_id: Set(input.batch_id),
            record_date: Set(input.record_date),
            feed_type: Set(feed_type),
            quantity_kg: Set(input.quantity_kg),
            cost: Set(input.cost.minor()),
            supplier: Set(clean(input.supplier)),
            notes: Set(clean(input.notes)),
            recorded_by: Set(input.recorded_by),
            created_at: Set(now()),
        }
        .insert(&self.db)
        .await?;

        info!(
            record_id = %record.id,
            batch_id = %record.batch_id,
            quantity_kg = %record.quantity_kg,
            "Feed usage recorded"
        );
        Ok(record)
    }

    /// Lists feed records, newest first.
    pub async fn list_feed(
        &self,
        filter: RecordFilter,
    ) -> Result<Vec<feed_records::Model>, ProductionError> {
        let mut query = feed_records::Entity::find()
            .order_by_desc(feed_records::Column::RecordDate)
            .order_by_desc(feed_records::Column::CreatedAt);
        query = scoped(
            query,
            filter,
            feed_records::Column::BatchId,
            feed_records::Column::RecordDate,
        );
        Ok(query.all(&self.db).await?)
    }

    /// Deletes a feed record. Returns `false` when it did not exist.
    pub async fn delete_feed(&self, id: Uuid) -> Result<bool, ProductionError> {
        let result = feed_records::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn ensure_batch(&self, batch_id: Uuid) -> Result<(), ProductionError> {
        poultry_batches::Entity::find_by_id(batch_id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(ProductionError::BatchNotFound(batch_id))
    }
}

/// Applies batch and date-range filters to a record query.
pub(crate) fn scoped<E, C>(mut query: Select<E>, filter: RecordFilter, batch: C, date: C) -> Select<E>
where
    E: EntityTrait,
    C: ColumnTrait,
{
    if let Some(batch_id) = filter.batch_id {
        query = query.filter(batch.eq(batch_id));
    }
    if let Some(from) = filter.from {
        query = query.filter(date.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(date.lte(to));
    }
    query
}
