//! Sales pricing rules.
//!
//! A sale's total is always derived here from quantity and unit price; the
//! caller never supplies it. The same total is what moves the customer's
//! `total_purchases` ledger, in both directions.

use coop_shared::Money;
use thiserror::Error;

#[cfg(test)]
mod sales_props;

/// Errors raised while pricing a sale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleError {
    /// Quantity below one.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    /// Unit price zero or negative.
    #[error("unit price must be greater than zero, got {0}")]
    InvalidUnitPrice(Money),

    /// The total does not fit in the ledger column.
    #[error("sale total overflows")]
    Overflow,
}

/// Computes `quantity × unit_price` after validating both inputs.
///
/// # Errors
///
/// Returns `SaleError::InvalidQuantity` for `quantity < 1`,
/// `SaleError::InvalidUnitPrice` for a non-positive price and
/// `SaleError::Overflow` when the product does not fit.
pub fn sale_total(quantity: i32, unit_price: Money) -> Result<Money, SaleError> {
    if quantity < 1 {
        return Err(SaleError::InvalidQuantity(quantity));
    }
    if !unit_price.is_positive() {
        return Err(SaleError::InvalidUnitPrice(unit_price));
    }
    unit_price
        .checked_mul(i64::from(quantity))
        .map_err(|_| SaleError::Overflow)
}

/// Returns the amount to subtract from the customer ledger when a sale is
/// deleted: the stored total, negated.
#[must_use]
pub const fn reversal_delta(stored_total: Money) -> Money {
    Money::from_minor(-stored_total.minor())
}
