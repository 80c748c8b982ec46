//! Order domain types.

use coop_shared::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status in the fulfilment lifecycle.
///
/// Orders move forward through
/// `New → Confirmed → Processing → Delivered`; `Cancelled` is reachable from
/// any non-terminal state. `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed by a customer, not yet looked at.
    New,
    /// Accepted by the farm.
    Confirmed,
    /// Being packed or prepared.
    Processing,
    /// Handed over to the customer (terminal).
    Delivered,
    /// Called off (terminal).
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Confirmed,
        Self::Processing,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses one of the five lowercase status names. Anything else,
    /// including other casings or padding, is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "confirmed" => Some(Self::Confirmed),
            "processing" => Some(Self::Processing),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Position along the forward path. `Cancelled` sits off the path.
    pub(crate) const fn rank(self) -> Option<u8> {
        match self {
            Self::New => Some(0),
            Self::Confirmed => Some(1),
            Self::Processing => Some(2),
            Self::Delivered => Some(3),
            Self::Cancelled => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order line as submitted by the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRequest {
    /// Product identifier, e.g. `eggs_tray`.
    pub product: String,
    /// Number of units.
    pub quantity: i32,
    /// Unit label, e.g. `tray`.
    #[serde(default)]
    pub unit: Option<String>,
    /// Caller's price, used only when the catalog has none.
    #[serde(default)]
    pub unit_price: Option<Money>,
}

/// An order line with its price fixed at placement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedItem {
    /// Product identifier.
    pub product: String,
    /// Number of units.
    pub quantity: i32,
    /// Unit label.
    pub unit: String,
    /// Unit price captured at placement.
    pub unit_price: Money,
    /// `quantity × unit_price`.
    pub line_total: Money,
}

/// A fully priced order ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedOrder {
    /// Item snapshot.
    pub items: Vec<PricedItem>,
    /// Sum of line totals.
    pub total_amount: Money,
}
