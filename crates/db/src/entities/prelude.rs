//! Entity re-exports.

pub use super::customers::Entity as Customers;
pub use super::egg_production::Entity as EggProduction;
pub use super::expenses::Entity as Expenses;
pub use super::feed_records::Entity as FeedRecords;
pub use super::health_records::Entity as HealthRecords;
pub use super::order_items::Entity as OrderItems;
pub use super::orders::Entity as Orders;
pub use super::poultry_batches::Entity as PoultryBatches;
pub use super::sales::Entity as Sales;
pub use super::site_settings::Entity as SiteSettings;
pub use super::users::Entity as Users;
