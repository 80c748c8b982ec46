//! Database seeder for development and first deployment.
//!
//! Creates the first admin account and the storefront settings the public
//! site expects. Safe to run repeatedly: existing rows are left alone.
//!
//! Usage: cargo run --bin seeder
//!
//! The admin account comes from `COOP_SEED_ADMIN_EMAIL` and
//! `COOP_SEED_ADMIN_PASSWORD` (development defaults otherwise).

use anyhow::Context;
use coop_core::auth::{hash_password, normalize_email, validate_password};
use coop_db::entities::sea_orm_active_enums::UserRole;
use coop_db::repositories::CreateUserInput;
use coop_db::{SettingRepository, UserRepository, connect_with};
use coop_shared::AppConfig;
use sea_orm::DatabaseConnection;

/// Storefront settings written when absent. Prices are in minor units.
const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    ("site_name", "Coop Farm"),
    ("contact_phone", "+256700000000"),
    ("contact_email", "orders@coop.local"),
    ("delivery_note", "Deliveries within Kampala on weekdays"),
    ("price.eggs_tray", "12000"),
    ("price.eggs_piece", "450"),
    ("price.broiler_live", "25000"),
    ("price.manure_bag", "8000"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding admin account...");
    seed_admin(&db).await?;

    println!("Seeding site settings...");
    seed_settings(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_admin(db: &DatabaseConnection) -> anyhow::Result<()> {
    let raw_email =
        std::env::var("COOP_SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@coop.local".to_string());
    let password =
        std::env::var("COOP_SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "change-me-now".to_string());

    let email = normalize_email(&raw_email)
        .with_context(|| format!("'{raw_email}' is not a valid email"))?;
    validate_password(&password)?;

    let users = UserRepository::new(db.clone());
    if users.find_by_email(&email).await?.is_some() {
        println!("  {email} already exists, skipping...");
        return Ok(());
    }

    let user = users
        .create(CreateUserInput {
            email,
            password_hash: hash_password(&password)?,
            full_name: "Farm Administrator".to_string(),
            role: UserRole::Admin,
        })
        .await?;
    println!("  Created admin {} ({})", user.email, user.id);
    Ok(())
}

async fn seed_settings(db: &DatabaseConnection) -> anyhow::Result<()> {
    let settings = SettingRepository::new(db.clone());
    for (key, value) in DEFAULT_SETTINGS {
        if settings.get(key).await?.is_some() {
            println!("  {key} already set, skipping...");
            continue;
        }
        settings.upsert(key, value).await?;
        println!("  {key} = {value}");
    }
    Ok(())
}
