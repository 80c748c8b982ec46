//! Order status transitions.

use crate::orders::error::OrderError;
use crate::orders::types::OrderStatus;

/// Stateless service deciding whether an order may change status.
///
/// Policy: forward moves along `New → Confirmed → Processing → Delivered`
/// (skipping steps is allowed), `Cancelled` from any non-terminal state,
/// and re-applying the current status is a no-op. Moving backwards or out
/// of `Delivered`/`Cancelled` is rejected.
pub struct OrderWorkflow;

impl OrderWorkflow {
    /// Validates a transition and returns the resulting status.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidTransition` when the move is not allowed.
    pub fn transition(from: OrderStatus, to: OrderStatus) -> Result<OrderStatus, OrderError> {
        if from == to {
            return Ok(to);
        }
        if from.is_terminal() {
            return Err(OrderError::InvalidTransition { from, to });
        }

        match (from.rank(), to.rank()) {
            (_, None) => Ok(to),
            (Some(current), Some(target)) if target > current => Ok(to),
            _ => Err(OrderError::InvalidTransition { from, to }),
        }
    }

    /// Parses a requested status and validates the transition in one step.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::UnknownStatus` for an unrecognised value, or
    /// `OrderError::InvalidTransition` when the move is not allowed.
    pub fn transition_to(from: OrderStatus, requested: &str) -> Result<OrderStatus, OrderError> {
        let to = OrderStatus::parse(requested)
            .ok_or_else(|| OrderError::UnknownStatus(requested.to_string()))?;
        Self::transition(from, to)
    }

    /// Statuses reachable from `from` in one update (excluding itself).
    #[must_use]
    pub fn allowed_targets(from: OrderStatus) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|&to| to != from && Self::transition(from, to).is_ok())
            .collect()
    }
}
