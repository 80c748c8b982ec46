//! Order error types.

use thiserror::Error;

use crate::orders::types::OrderStatus;

/// Errors that can occur while placing or progressing an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Attempted a status change the lifecycle does not allow.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: OrderStatus,
        /// The attempted target status.
        to: OrderStatus,
    },

    /// Status string outside the known set.
    #[error("Unknown order status '{0}'")]
    UnknownStatus(String),

    /// Customer name missing.
    #[error("Customer name is required")]
    MissingCustomerName,

    /// Customer phone missing.
    #[error("Customer phone is required")]
    MissingCustomerPhone,

    /// Order with no lines.
    #[error("Order must contain at least one item")]
    NoItems,

    /// A line without a product identifier.
    #[error("Item {0} has no product")]
    MissingProduct(usize),

    /// A line with quantity below one.
    #[error("Quantity for '{product}' must be at least 1, got {quantity}")]
    InvalidQuantity {
        /// Product identifier.
        product: String,
        /// Submitted quantity.
        quantity: i32,
    },

    /// Neither the catalog nor the caller supplied a usable price.
    #[error("No price available for '{0}'")]
    MissingPrice(String),

    /// Amount arithmetic overflowed.
    #[error("Order total overflows")]
    Overflow,
}

impl OrderError {
    /// Returns true for input problems (as opposed to lifecycle rule breaks).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(self, Self::InvalidTransition { .. })
    }
}
