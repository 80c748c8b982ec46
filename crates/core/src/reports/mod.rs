//! Dashboard reporting: time windows, chart series and activity feed.
//!
//! The database layer fetches raw rows; everything about *which* dates fall
//! in a window and how rows are bucketed lives here so it can be tested
//! without a database.

pub mod activity;
pub mod series;
pub mod types;
pub mod windows;

pub use activity::merge_recent;
pub use series::{daily_egg_series, laying_rate, month_starts, monthly_finance_series};
pub use types::*;
pub use windows::{ChartRange, ReportWindows};
