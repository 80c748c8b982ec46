//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Every operation that moves a denormalized counter (customer
//! `total_purchases`, batch `current_count`) runs inside one
//! `DatabaseTransaction` together with the row that causes it.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    BatchRepository, CustomerRepository, DashboardRepository, ExpenseRepository,
    HealthRepository, OrderRepository, ProductionRepository, SaleRepository, SettingRepository,
    UserRepository,
};

use std::time::Duration;

use coop_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection sized from configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}
