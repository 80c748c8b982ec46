//! Flock bookkeeping rules: batch head counts, mortality, egg and feed records.
//!
//! `current_count` on a batch only ever moves down through recorded
//! mortality. A mortality event larger than the live count is refused, so
//! `current_count = initial_count - Σ mortality` always holds and never goes
//! negative.

use coop_shared::Money;
use rust_decimal::Decimal;
use thiserror::Error;

#[cfg(test)]
mod flock_props;

/// Errors raised by flock validation rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlockError {
    /// Batch created with zero or negative birds.
    #[error("initial count must be at least 1, got {0}")]
    InvalidInitialCount(i32),

    /// Administrative correction to a negative head count.
    #[error("current count cannot be negative, got {0}")]
    NegativeCount(i32),

    /// Mortality count below zero.
    #[error("mortality count cannot be negative, got {0}")]
    NegativeMortality(i32),

    /// Mortality exceeds the birds still alive in the batch.
    #[error("mortality of {requested} exceeds the {available} live birds in the batch")]
    MortalityExceedsLiveCount {
        /// Deaths being recorded.
        requested: i32,
        /// Current live count.
        available: i32,
    },

    /// Egg collection with a negative count.
    #[error("egg counts cannot be negative")]
    NegativeEggCount,

    /// More broken eggs than collected.
    #[error("broken eggs ({broken}) cannot exceed eggs collected ({collected})")]
    BrokenExceedsCollected {
        /// Eggs collected.
        collected: i32,
        /// Eggs broken.
        broken: i32,
    },

    /// Feed quantity zero or negative.
    #[error("feed quantity must be greater than zero, got {0}")]
    InvalidFeedQuantity(Decimal),

    /// Negative cost on a feed, health or batch record.
    #[error("cost cannot be negative, got {0}")]
    NegativeCost(Money),
}

/// Validates the head count a new batch starts with.
pub fn validate_initial_count(initial_count: i32) -> Result<(), FlockError> {
    if initial_count < 1 {
        return Err(FlockError::InvalidInitialCount(initial_count));
    }
    Ok(())
}

/// Validates an administrative head-count correction.
pub fn validate_count_correction(current_count: i32) -> Result<(), FlockError> {
    if current_count < 0 {
        return Err(FlockError::NegativeCount(current_count));
    }
    Ok(())
}

/// Validates a mortality figure on its own, before the batch is read.
pub fn validate_mortality(mortality_count: i32) -> Result<(), FlockError> {
    if mortality_count < 0 {
        return Err(FlockError::NegativeMortality(mortality_count));
    }
    Ok(())
}

/// Returns the live count after recording `mortality_count` deaths.
///
/// # Errors
///
/// Returns `FlockError::MortalityExceedsLiveCount` when the batch does not
/// have that many birds left.
pub fn apply_mortality(current_count: i32, mortality_count: i32) -> Result<i32, FlockError> {
    validate_mortality(mortality_count)?;
    if mortality_count > current_count {
        return Err(FlockError::MortalityExceedsLiveCount {
            requested: mortality_count,
            available: current_count,
        });
    }
    Ok(current_count - mortality_count)
}

/// Validates an egg collection record.
pub fn validate_egg_collection(collected: i32, broken: i32) -> Result<(), FlockError> {
    if collected < 0 || broken < 0 {
        return Err(FlockError::NegativeEggCount);
    }
    if broken > collected {
        return Err(FlockError::BrokenExceedsCollected { collected, broken });
    }
    Ok(())
}

/// Validates a feed record.
pub fn validate_feed(quantity_kg: Decimal, cost: Money) -> Result<(), FlockError> {
    if quantity_kg <= Decimal::ZERO {
        return Err(FlockError::InvalidFeedQuantity(quantity_kg));
    }
    validate_cost(cost)
}

/// Validates a non-negative cost.
pub fn validate_cost(cost: Money) -> Result<(), FlockError> {
    if cost.minor() < 0 {
        return Err(FlockError::NegativeCost(cost));
    }
    Ok(())
}
