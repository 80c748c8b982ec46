//! Order lifecycle for the public storefront.
//!
//! This module implements the order status state machine, order-number
//! generation, item pricing against the catalog and the operator notice.
//!
//! # Modules
//!
//! - `types` - Order status and item snapshot types
//! - `error` - Order-specific error types
//! - `workflow` - Status transition rules
//! - `number` - Order-number generation
//! - `pricing` - Catalog lookup and order totals
//! - `notice` - Operator notification text

pub mod error;
pub mod notice;
pub mod number;
pub mod pricing;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod workflow_props;

pub use error::OrderError;
pub use notice::OrderNotice;
pub use number::{OrderNumberSource, TimestampOrderNumbers, is_well_formed};
pub use pricing::{CATALOG_PRICE_PREFIX, Catalog, price_order, validate_contact};
pub use types::{OrderItemRequest, OrderStatus, PricedItem, PricedOrder};
pub use workflow::OrderWorkflow;
