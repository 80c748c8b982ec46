//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

mod common;

pub mod batch;
pub mod customer;
pub mod dashboard;
pub mod expense;
pub mod health;
pub mod order;
pub mod production;
pub mod sale;
pub mod setting;
pub mod user;

pub use batch::{BatchError, BatchRepository, CreateBatchInput, UpdateBatchInput};
pub use customer::{
    CreateCustomerInput, CustomerError, CustomerFilter, CustomerRepository, UpdateCustomerInput,
};
pub use dashboard::{DashboardError, DashboardRepository};
pub use expense::{
    CreateExpenseInput, ExpenseError, ExpenseFilter, ExpenseRepository, UpdateExpenseInput,
};
pub use health::{HealthError, HealthEvent, HealthRepository, RecordHealthInput};
pub use order::{
    MAX_ORDER_NUMBER_ATTEMPTS, OrderError, OrderRepository, OrderWithItems, PlaceOrderInput,
    PlacedOrder,
};
pub use production::{
    CreateEggRecordInput, CreateFeedRecordInput, ProductionError, ProductionRepository,
    RecordFilter,
};
pub use sale::{RecordSaleInput, SaleError, SaleFilter, SaleRepository, UpdateSalePaymentInput};
pub use setting::{SettingError, SettingRepository};
pub use user::{CreateUserInput, UserError, UserRepository};
