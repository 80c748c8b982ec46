//! `SeaORM` entity definitions.

pub mod prelude;

pub mod customers;
pub mod egg_production;
pub mod expenses;
pub mod feed_records;
pub mod health_records;
pub mod order_items;
pub mod orders;
pub mod poultry_batches;
pub mod sales;
pub mod sea_orm_active_enums;
pub mod site_settings;
pub mod users;
