//! `SeaORM` Entity for feed_records table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "feed_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub batch_id: Uuid,
    pub record_date: Date,
    pub feed_type: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub quantity_kg: Decimal,
    pub cost: i64,
    pub supplier: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::poultry_batches::Entity",
        from = "Column::BatchId",
        to = "super::poultry_batches::Column::Id"
    )]
    PoultryBatches,
}

impl Related<super::poultry_batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PoultryBatches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
