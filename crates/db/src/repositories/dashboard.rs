//! Dashboard aggregates, chart series and the recent-activity feed.
//!
//! Sums run in the database; calendar bucketing and rates are computed in
//! `coop_core::reports` so both backends produce identical series.

use chrono::{Days, NaiveDate, Utc};
use coop_core::reports::{
    self, ActivityItem, ActivityKind, DashboardStats, EggChartPoint, EggStats, FeedStats,
    FinanceChartPoint, FinanceTotals, FlockStats, OrderStats, ReportWindows,
};
use coop_shared::{AppError, Money};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use super::common::sum_i64;
use crate::entities::{
    customers, egg_production, expenses, feed_records, health_records, orders, poultry_batches,
    sales,
    sea_orm_active_enums::{BatchStatus, HealthRecordType, OrderStatus, SaleType},
};

/// Errors that can occur while building dashboard data.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        Self::Database(err.to_string())
    }
}

/// Read-only reporting queries.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Headline figures as of `windows.today`.
    pub async fn stats(&self, windows: ReportWindows) -> Result<DashboardStats, DashboardError> {
        let ReportWindows {
            today,
            week_start,
            month_start,
        } = windows;

        let active = poultry_batches::Entity::find()
            .filter(poultry_batches::Column::Status.eq(BatchStatus::Active));
        let live_birds = sum_i64(
            active.clone(),
            poultry_batches::Column::CurrentCount,
            &self.db,
        )
        .await?;
        let active_batches = active.count(&self.db).await?;

        let mortality_month_to_date = sum_i64(
            health_records::Entity::find()
                .filter(health_records::Column::RecordDate.between(month_start, today)),
            health_records::Column::MortalityCount,
            &self.db,
        )
        .await?;

        let eggs_since = |from: NaiveDate| {
            egg_production::Entity::find()
                .filter(egg_production::Column::RecordDate.between(from, today))
        };
        let eggs_today = sum_i64(eggs_since(today), egg_production::Column::EggsCollected, &self.db).await?;
        let eggs_week = sum_i64(
            eggs_since(week_start),
            egg_production::Column::EggsCollected,
            &self.db,
        )
        .await?;
        let eggs_month = sum_i64(
            eggs_since(month_start),
            egg_production::Column::EggsCollected,
            &self.db,
        )
        .await?;

        let feed_month = feed_records::Entity::find()
            .filter(feed_records::Column::RecordDate.between(month_start, today));
        let quantity_kg_month_to_date: Decimal = feed_month
            .clone()
            .select_only()
            .column(feed_records::Column::QuantityKg)
            .into_tuple::<Decimal>()
            .all(&self.db)
            .await?
            .into_iter()
            .sum();
        let feed_cost = sum_i64(feed_month, feed_records::Column::Cost, &self.db).await?;

        let revenue_month = sum_i64(
            sales::Entity::find().filter(sales::Column::SaleDate.between(month_start, today)),
            sales::Column::TotalAmount,
            &self.db,
        )
        .await?;
        let expenses_month = sum_i64(
            expenses::Entity::find()
                .filter(expenses::Column::ExpenseDate.between(month_start, today)),
            expenses::Column::Amount,
            &self.db,
        )
        .await?;
        let revenue_all = sum_i64(sales::Entity::find(), sales::Column::TotalAmount, &self.db).await?;
        let expenses_all = sum_i64(expenses::Entity::find(), expenses::Column::Amount, &self.db).await?;

        let customers_total = customers::Entity::find().count(&self.db).await?;
        let orders_total = orders::Entity::find().count(&self.db).await?;
        let orders_pending = orders::Entity::find()
            .filter(orders::Column::Status.eq(OrderStatus::New))
            .count(&self.db)
            .await?;

        Ok(DashboardStats {
            as_of: today,
            flock: FlockStats {
                live_birds,
                active_batches,
                mortality_month_to_date,
            },
            eggs: EggStats {
                today: eggs_today,
                week_to_date: eggs_week,
                month_to_date: eggs_month,
                laying_rate_percent: reports::laying_rate(
                    eggs_month,
                    live_birds,
                    windows.days_elapsed_in_month(),
                ),
            },
            feed: FeedStats {
                quantity_kg_month_to_date,
                cost_month_to_date: Money::from_minor(feed_cost),
            },
            month_to_date: FinanceTotals::new(
                Money::from_minor(revenue_month),
                Money::from_minor(expenses_month),
            ),
            all_time: FinanceTotals::new(
                Money::from_minor(revenue_all),
                Money::from_minor(expenses_all),
            ),
            customers_total,
            orders: OrderStats {
                total: orders_total,
                pending: orders_pending,
            },
        })
    }

    /// Daily collected and broken eggs for the `days` days ending `today`.
    pub async fn egg_chart(
        &self,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<EggChartPoint>, DashboardError> {
        let start = today
            .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
            .unwrap_or(today);

        let rows: Vec<(NaiveDate, i64, i64)> = egg_production::Entity::find()
            .select_only()
            .column(egg_production::Column::RecordDate)
            .column(egg_production::Column::EggsCollected)
            .column(egg_production::Column::BrokenEggs)
            .filter(egg_production::Column::RecordDate.between(start, today))
            .into_tuple::<(NaiveDate, i32, i32)>()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(date, collected, broken)| (date, i64::from(collected), i64::from(broken)))
            .collect();

        Ok(reports::daily_egg_series(today, days, &rows))
    }

    /// Monthly revenue against expenses for the `months` months ending with
    /// `today`'s.
    pub async fn finance_chart(
        &self,
        today: NaiveDate,
        months: u32,
    ) -> Result<Vec<FinanceChartPoint>, DashboardError> {
        let starts = reports::month_starts(today, months);
        let first = starts.first().copied().unwrap_or(today);

        let revenue: Vec<(NaiveDate, Money)> = sales::Entity::find()
            .select_only()
            .column(sales::Column::SaleDate)
            .column(sales::Column::TotalAmount)
            .filter(sales::Column::SaleDate.gte(first))
            .into_tuple::<(NaiveDate, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(date, amount)| (date, Money::from_minor(amount)))
            .collect();

        let spent: Vec<(NaiveDate, Money)> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::ExpenseDate)
            .column(expenses::Column::Amount)
            .filter(expenses::Column::ExpenseDate.gte(first))
            .into_tuple::<(NaiveDate, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(date, amount)| (date, Money::from_minor(amount)))
            .collect();

        Ok(reports::monthly_finance_series(&starts, &revenue, &spent))
    }

    /// Newest sales, egg collections and health events, merged.
    pub async fn recent_activity(&self, limit: u64) -> Result<Vec<ActivityItem>, DashboardError> {
        let sales_feed = sales::Entity::find()
            .find_also_related(customers::Entity)
            .order_by_desc(sales::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(sale, customer)| ActivityItem {
                kind: ActivityKind::Sale,
                id: sale.id,
                description: format!(
                    "Sold {} {} to {}",
                    sale.quantity,
                    sale_label(sale.sale_type),
                    customer.map_or_else(|| "unknown customer".to_string(), |c| c.name)
                ),
                amount: Some(Money::from_minor(sale.total_amount)),
                occurred_at: sale.created_at.with_timezone(&Utc),
            })
            .collect();

        let egg_feed = egg_production::Entity::find()
            .order_by_desc(egg_production::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|record| ActivityItem {
                kind: ActivityKind::EggCollection,
                id: record.id,
                description: format!(
                    "Collected {} eggs ({} broken)",
                    record.eggs_collected, record.broken_eggs
                ),
                amount: None,
                occurred_at: record.created_at.with_timezone(&Utc),
            })
            .collect();

        let health_feed = health_records::Entity::find()
            .order_by_desc(health_records::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|record| ActivityItem {
                kind: ActivityKind::HealthEvent,
                id: record.id,
                description: health_line(&record),
                amount: (record.cost > 0).then(|| Money::from_minor(record.cost)),
                occurred_at: record.created_at.with_timezone(&Utc),
            })
            .collect();

        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(reports::merge_recent([sales_feed, egg_feed, health_feed], limit))
    }
}

const fn sale_label(sale_type: SaleType) -> &'static str {
    match sale_type {
        SaleType::Eggs => "eggs",
        SaleType::Birds => "birds",
        SaleType::Manure => "manure",
        SaleType::Other => "items",
    }
}

fn health_line(record: &health_records::Model) -> String {
    let kind = match record.record_type {
        HealthRecordType::Vaccination => "Vaccination",
        HealthRecordType::Treatment => "Treatment",
        HealthRecordType::Checkup => "Checkup",
        HealthRecordType::Mortality => "Mortality",
        HealthRecordType::Other => "Health event",
    };
    if record.mortality_count > 0 {
        format!(
            "{kind}: {} ({} dead)",
            record.description, record.mortality_count
        )
    } else {
        format!("{kind}: {}", record.description)
    }
}
