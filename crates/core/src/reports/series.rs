//! Chart series and derived rates.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use coop_shared::Money;
use rust_decimal::Decimal;

use crate::reports::types::{EggChartPoint, FinanceChartPoint, FinanceTotals};

/// Month-to-date laying rate: eggs ÷ (live birds × days) × 100, two decimals.
///
/// Zero when there are no birds or no elapsed days.
#[must_use]
pub fn laying_rate(eggs: i64, live_birds: i64, days: u32) -> Decimal {
    if live_birds <= 0 || days == 0 {
        return Decimal::ZERO;
    }
    let bird_days = Decimal::from(live_birds) * Decimal::from(days);
    (Decimal::from(eggs) * Decimal::ONE_HUNDRED / bird_days).round_dp(2)
}

/// One point per day from `days - 1` days before `today` through `today`,
/// summing `(date, collected, broken)` rows and filling gaps with zero.
#[must_use]
pub fn daily_egg_series(
    today: NaiveDate,
    days: u32,
    rows: &[(NaiveDate, i64, i64)],
) -> Vec<EggChartPoint> {
    let start = today
        .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(today);

    let mut buckets: BTreeMap<NaiveDate, (i64, i64)> = start
        .iter_days()
        .take_while(|d| *d <= today)
        .map(|d| (d, (0, 0)))
        .collect();
    for (date, collected, broken) in rows {
        if let Some(bucket) = buckets.get_mut(date) {
            bucket.0 += collected;
            bucket.1 += broken;
        }
    }

    buckets
        .into_iter()
        .map(|(date, (collected, broken))| EggChartPoint {
            date,
            collected,
            broken,
        })
        .collect()
}

/// First days of the last `months` months ending with `today`'s, oldest first.
#[must_use]
pub fn month_starts(today: NaiveDate, months: u32) -> Vec<NaiveDate> {
    let current = today.with_day(1).unwrap_or(today);
    (0..months)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .collect()
}

/// Buckets dated revenue and expense rows into the given months.
///
/// Rows outside the months are ignored.
#[must_use]
pub fn monthly_finance_series(
    months: &[NaiveDate],
    revenue: &[(NaiveDate, Money)],
    expenses: &[(NaiveDate, Money)],
) -> Vec<FinanceChartPoint> {
    let key = |d: &NaiveDate| (d.year(), d.month());
    let mut buckets: BTreeMap<(i32, u32), (i64, i64)> =
        months.iter().map(|m| (key(m), (0, 0))).collect();

    for (date, amount) in revenue {
        if let Some(bucket) = buckets.get_mut(&key(date)) {
            bucket.0 = bucket.0.saturating_add(amount.minor());
        }
    }
    for (date, amount) in expenses {
        if let Some(bucket) = buckets.get_mut(&key(date)) {
            bucket.1 = bucket.1.saturating_add(amount.minor());
        }
    }

    buckets
        .into_iter()
        .map(|((year, month), (rev, exp))| FinanceChartPoint {
            month: format!("{year:04}-{month:02}"),
            totals: FinanceTotals::new(Money::from_minor(rev), Money::from_minor(exp)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_laying_rate() {
        // 2,400 eggs from 100 birds over 30 days = 80%
        assert_eq!(laying_rate(2_400, 100, 30), dec!(80.00));
        assert_eq!(laying_rate(1, 3, 1), dec!(33.33));
        assert_eq!(laying_rate(500, 0, 10), Decimal::ZERO);
        assert_eq!(laying_rate(500, 10, 0), Decimal::ZERO);
    }

    #[test]
    fn test_daily_series_fills_gaps() {
        let today = date(2026, 10, 16);
        let rows = [
            (date(2026, 10, 14), 300, 4),
            (date(2026, 10, 16), 280, 2),
            (date(2026, 10, 16), 20, 1),
            (date(2026, 9, 1), 999, 9),
        ];

        let series = daily_egg_series(today, 3, &rows);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, date(2026, 10, 14));
        assert_eq!((series[0].collected, series[0].broken), (300, 4));
        assert_eq!((series[1].collected, series[1].broken), (0, 0));
        assert_eq!((series[2].collected, series[2].broken), (300, 3));
    }

    #[test]
    fn test_month_starts_cross_year() {
        assert_eq!(
            month_starts(date(2026, 2, 15), 3),
            vec![date(2025, 12, 1), date(2026, 1, 1), date(2026, 2, 1)]
        );
    }

    #[test]
    fn test_monthly_finance_series() {
        let months = month_starts(date(2026, 10, 16), 2);
        let revenue = [
            (date(2026, 9, 3), Money::from_minor(10_000)),
            (date(2026, 10, 1), Money::from_minor(7_000)),
            (date(2026, 10, 9), Money::from_minor(3_000)),
            (date(2025, 10, 9), Money::from_minor(50_000)),
        ];
        let expenses = [(date(2026, 10, 2), Money::from_minor(4_000))];

        let series = monthly_finance_series(&months, &revenue, &expenses);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].month, "2026-09");
        assert_eq!(series[0].totals.revenue, Money::from_minor(10_000));
        assert_eq!(series[1].month, "2026-10");
        assert_eq!(series[1].totals.revenue, Money::from_minor(10_000));
        assert_eq!(series[1].totals.expenses, Money::from_minor(4_000));
        assert_eq!(series[1].totals.profit, Money::from_minor(6_000));
    }
}
