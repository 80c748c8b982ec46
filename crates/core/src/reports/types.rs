//! Dashboard data types.

use chrono::{DateTime, NaiveDate, Utc};
use coop_shared::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Headline numbers for the back-office dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Local date the figures were computed for.
    pub as_of: NaiveDate,
    /// Flock figures.
    pub flock: FlockStats,
    /// Egg collection figures.
    pub eggs: EggStats,
    /// Feed usage this month.
    pub feed: FeedStats,
    /// Money in and out, month to date.
    pub month_to_date: FinanceTotals,
    /// Money in and out, all time.
    pub all_time: FinanceTotals,
    /// Customer and order counts.
    pub customers_total: u64,
    /// Order counts.
    pub orders: OrderStats,
}

/// Flock figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlockStats {
    /// Σ current_count over active batches.
    pub live_birds: i64,
    /// Number of active batches.
    pub active_batches: u64,
    /// Deaths recorded this month.
    pub mortality_month_to_date: i64,
}

/// Egg collection figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggStats {
    /// Eggs collected today.
    pub today: i64,
    /// Eggs collected since Monday.
    pub week_to_date: i64,
    /// Eggs collected since the 1st.
    pub month_to_date: i64,
    /// Month-to-date laying rate in percent, two decimals.
    pub laying_rate_percent: Decimal,
}

/// Feed usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedStats {
    /// Kilograms fed this month.
    pub quantity_kg_month_to_date: Decimal,
    /// Feed spend this month.
    pub cost_month_to_date: Money,
}

/// Revenue, expenses and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceTotals {
    /// Σ sale totals.
    pub revenue: Money,
    /// Σ expense amounts.
    pub expenses: Money,
    /// revenue − expenses.
    pub profit: Money,
}

impl FinanceTotals {
    /// Builds totals and derives profit.
    #[must_use]
    pub fn new(revenue: Money, expenses: Money) -> Self {
        let profit = Money::from_minor(revenue.minor().saturating_sub(expenses.minor()));
        Self {
            revenue,
            expenses,
            profit,
        }
    }
}

/// Order counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStats {
    /// Orders ever placed.
    pub total: u64,
    /// Orders still in status `new`.
    pub pending: u64,
}

/// One day on the egg chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggChartPoint {
    /// Collection date.
    pub date: NaiveDate,
    /// Eggs collected.
    pub collected: i64,
    /// Eggs broken.
    pub broken: i64,
}

/// One month on the finance chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceChartPoint {
    /// Month label, `YYYY-MM`.
    pub month: String,
    /// Totals for the month.
    #[serde(flatten)]
    pub totals: FinanceTotals,
}

/// Source table of an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A recorded sale.
    Sale,
    /// An egg collection record.
    EggCollection,
    /// A health event.
    HealthEvent,
}

/// One row in the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
    /// Where the row came from.
    pub kind: ActivityKind,
    /// Source row id.
    pub id: Uuid,
    /// Human-readable line.
    pub description: String,
    /// Amount, for money-bearing rows.
    pub amount: Option<Money>,
    /// When the row was written.
    pub occurred_at: DateTime<Utc>,
}
