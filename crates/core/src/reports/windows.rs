//! Reporting windows in the farm's local calendar.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// Calendar anchors for "today", this ISO week and this month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindows {
    /// Local date of the request.
    pub today: NaiveDate,
    /// Monday of the current ISO week.
    pub week_start: NaiveDate,
    /// First day of the current month.
    pub month_start: NaiveDate,
}

impl ReportWindows {
    /// Windows for the instant `now` as seen in `tz`.
    #[must_use]
    pub fn at(now: DateTime<Utc>, tz: Tz) -> Self {
        Self::for_date(now.with_timezone(&tz).date_naive())
    }

    /// Windows anchored on a given local date.
    #[must_use]
    pub fn for_date(today: NaiveDate) -> Self {
        let from_monday = u64::from(today.weekday().num_days_from_monday());
        let week_start = today.checked_sub_days(Days::new(from_monday)).unwrap_or(today);
        let month_start = today.with_day(1).unwrap_or(today);
        Self {
            today,
            week_start,
            month_start,
        }
    }

    /// Days of the current month up to and including today.
    #[must_use]
    pub fn days_elapsed_in_month(&self) -> u32 {
        self.today.day()
    }
}

/// Validated query range for the chart endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRange;

impl ChartRange {
    /// Default number of days on the egg chart.
    pub const DEFAULT_DAYS: u32 = 30;
    /// Longest egg chart.
    pub const MAX_DAYS: u32 = 365;
    /// Default number of months on the finance chart.
    pub const DEFAULT_MONTHS: u32 = 6;
    /// Longest finance chart.
    pub const MAX_MONTHS: u32 = 24;
    /// Default length of the activity feed.
    pub const DEFAULT_ACTIVITY: u64 = 20;
    /// Longest activity feed.
    pub const MAX_ACTIVITY: u64 = 100;

    /// Clamps a requested day count into `1..=MAX_DAYS`.
    #[must_use]
    pub fn days(requested: Option<u32>) -> u32 {
        requested.unwrap_or(Self::DEFAULT_DAYS).clamp(1, Self::MAX_DAYS)
    }

    /// Clamps a requested month count into `1..=MAX_MONTHS`.
    #[must_use]
    pub fn months(requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(Self::DEFAULT_MONTHS)
            .clamp(1, Self::MAX_MONTHS)
    }

    /// Clamps a requested feed length into `1..=MAX_ACTIVITY`.
    #[must_use]
    pub fn activity_limit(requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(Self::DEFAULT_ACTIVITY)
            .clamp(1, Self::MAX_ACTIVITY)
    }
}
