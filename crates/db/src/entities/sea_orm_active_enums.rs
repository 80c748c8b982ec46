//! `SeaORM` active enums, stored as short strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Storefront account.
    #[sea_orm(string_value = "customer")]
    Customer,
    /// Farm staff.
    #[sea_orm(string_value = "employee")]
    Employee,
    /// Administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Kind of buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    /// Walk-in or household buyer.
    #[sea_orm(string_value = "individual")]
    Individual,
    /// Shop reselling produce.
    #[sea_orm(string_value = "retailer")]
    Retailer,
    /// Bulk buyer.
    #[sea_orm(string_value = "wholesaler")]
    Wholesaler,
    /// Restaurant or hotel.
    #[sea_orm(string_value = "restaurant")]
    Restaurant,
}

/// Purpose of a flock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum BirdType {
    /// Egg layers.
    #[sea_orm(string_value = "layer")]
    Layer,
    /// Meat birds.
    #[sea_orm(string_value = "broiler")]
    Broiler,
    /// Local dual-purpose birds.
    #[sea_orm(string_value = "dual_purpose")]
    DualPurpose,
}

/// Batch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Birds on the farm.
    #[sea_orm(string_value = "active")]
    Active,
    /// Batch sold off.
    #[sea_orm(string_value = "sold")]
    Sold,
    /// Retired from tracking.
    #[sea_orm(string_value = "archived")]
    Archived,
}

/// Kind of health event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum HealthRecordType {
    /// Scheduled vaccination.
    #[sea_orm(string_value = "vaccination")]
    Vaccination,
    /// Medication or treatment.
    #[sea_orm(string_value = "treatment")]
    Treatment,
    /// Routine inspection.
    #[sea_orm(string_value = "checkup")]
    Checkup,
    /// Deaths recorded.
    #[sea_orm(string_value = "mortality")]
    Mortality,
    /// Anything else.
    #[sea_orm(string_value = "other")]
    Other,
}

/// What was sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    /// Eggs (trays or pieces).
    #[sea_orm(string_value = "eggs")]
    Eggs,
    /// Live or dressed birds.
    #[sea_orm(string_value = "birds")]
    Birds,
    /// Manure.
    #[sea_orm(string_value = "manure")]
    Manure,
    /// Anything else.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Settlement state of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing paid yet.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Partly paid.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Fully paid.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// How money changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Mobile money transfer.
    #[sea_orm(string_value = "mobile_money")]
    MobileMoney,
    /// Bank transfer.
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// On account.
    #[sea_orm(string_value = "credit")]
    Credit,
}

/// Expense bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Feed purchases.
    #[sea_orm(string_value = "feed")]
    Feed,
    /// Drugs and vaccines.
    #[sea_orm(string_value = "medication")]
    Medication,
    /// Wages.
    #[sea_orm(string_value = "labor")]
    Labor,
    /// Water, power, fuel.
    #[sea_orm(string_value = "utilities")]
    Utilities,
    /// Equipment.
    #[sea_orm(string_value = "equipment")]
    Equipment,
    /// Deliveries and transport.
    #[sea_orm(string_value = "transport")]
    Transport,
    /// Repairs.
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    /// Anything else.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Storefront order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Just placed.
    #[sea_orm(string_value = "new")]
    New,
    /// Accepted.
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Being prepared.
    #[sea_orm(string_value = "processing")]
    Processing,
    /// Handed over.
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Called off.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<OrderStatus> for coop_core::orders::OrderStatus {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::New => Self::New,
            OrderStatus::Confirmed => Self::Confirmed,
            OrderStatus::Processing => Self::Processing,
            OrderStatus::Delivered => Self::Delivered,
            OrderStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<coop_core::orders::OrderStatus> for OrderStatus {
    fn from(status: coop_core::orders::OrderStatus) -> Self {
        use coop_core::orders::OrderStatus as Core;
        match status {
            Core::New => Self::New,
            Core::Confirmed => Self::Confirmed,
            Core::Processing => Self::Processing,
            Core::Delivered => Self::Delivered,
            Core::Cancelled => Self::Cancelled,
        }
    }
}

impl From<UserRole> for coop_core::auth::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Customer => Self::Customer,
            UserRole::Employee => Self::Employee,
            UserRole::Admin => Self::Admin,
        }
    }
}

impl From<coop_core::auth::UserRole> for UserRole {
    fn from(role: coop_core::auth::UserRole) -> Self {
        use coop_core::auth::UserRole as Core;
        match role {
            Core::Customer => Self::Customer,
            Core::Employee => Self::Employee,
            Core::Admin => Self::Admin,
        }
    }
}
