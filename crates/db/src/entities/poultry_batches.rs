//! `SeaORM` Entity for poultry_batches table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{BatchStatus, BirdType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "poultry_batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub batch_name: String,
    pub breed: Option<String>,
    pub bird_type: BirdType,
    pub initial_count: i32,
    pub current_count: i32,
    pub acquisition_date: Date,
    pub acquisition_cost: i64,
    pub status: BatchStatus,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::egg_production::Entity")]
    EggProduction,
    #[sea_orm(has_many = "super::feed_records::Entity")]
    FeedRecords,
    #[sea_orm(has_many = "super::health_records::Entity")]
    HealthRecords,
}

impl Related<super::egg_production::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EggProduction.def()
    }
}

impl Related<super::feed_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeedRecords.def()
    }
}

impl Related<super::health_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HealthRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
