//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own migrated in-memory SQLite database.

#![allow(dead_code)]

use chrono::NaiveDate;
use coop_db::entities::sea_orm_active_enums::{BirdType, CustomerType};
use coop_db::entities::{customers, poultry_batches};
use coop_db::migration::Migrator;
use coop_db::repositories::{
    BatchRepository, CreateBatchInput, CreateCustomerInput, CustomerRepository,
};
use coop_shared::Money;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh migrated database. One pooled connection keeps the in-memory
/// database shared by every query.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub async fn customer(db: &DatabaseConnection, name: &str) -> customers::Model {
    CustomerRepository::new(db.clone())
        .create(CreateCustomerInput {
            name: name.to_string(),
            customer_type: Some(CustomerType::Retailer),
            ..Default::default()
        })
        .await
        .expect("create customer")
}

pub async fn batch(db: &DatabaseConnection, birds: i32) -> poultry_batches::Model {
    BatchRepository::new(db.clone())
        .create(CreateBatchInput {
            batch_name: format!("Layers {birds}"),
            breed: Some("Kuroiler".to_string()),
            bird_type: BirdType::Layer,
            initial_count: birds,
            acquisition_date: date(2026, 6, 1),
            acquisition_cost: Money::from_minor(1_500_000),
            notes: None,
            created_by: None,
        })
        .await
        .expect("create batch")
}
