//! Back-office dashboard: headline figures, charts and recent activity.

use axum::{Router, extract::State, routing::get};
use chrono::Utc;
use coop_core::reports::{
    ActivityItem, ChartRange, DashboardStats, EggChartPoint, FinanceChartPoint, ReportWindows,
};
use coop_db::DashboardRepository;
use serde::Deserialize;

use crate::{
    AppState,
    error::ApiResult,
    extractors::{AppJson, AppQuery},
    middleware::StaffUser,
};

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(stats))
        .route("/dashboard/charts/eggs", get(egg_chart))
        .route("/dashboard/charts/finance", get(finance_chart))
        .route("/dashboard/recent-activity", get(recent_activity))
}

/// Query parameters for the egg chart.
#[derive(Debug, Deserialize)]
pub struct EggChartQuery {
    /// Days to cover, ending today.
    pub days: Option<u32>,
}

/// Query parameters for the finance chart.
#[derive(Debug, Deserialize)]
pub struct FinanceChartQuery {
    /// Calendar months to cover, ending with the current one.
    pub months: Option<u32>,
}

/// Query parameters for the activity feed.
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// Maximum number of entries.
    pub limit: Option<u64>,
}

/// "Now" in the farm's timezone.
fn windows(state: &AppState) -> ReportWindows {
    ReportWindows::at(Utc::now(), state.config.business.tz())
}

async fn stats(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> ApiResult<AppJson<DashboardStats>> {
    let stats = DashboardRepository::new(state.db())
        .stats(windows(&state))
        .await?;
    Ok(AppJson(stats))
}

async fn egg_chart(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(query): AppQuery<EggChartQuery>,
) -> ApiResult<AppJson<Vec<EggChartPoint>>> {
    let points = DashboardRepository::new(state.db())
        .egg_chart(windows(&state).today, ChartRange::days(query.days))
        .await?;
    Ok(AppJson(points))
}

async fn finance_chart(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(query): AppQuery<FinanceChartQuery>,
) -> ApiResult<AppJson<Vec<FinanceChartPoint>>> {
    let points = DashboardRepository::new(state.db())
        .finance_chart(windows(&state).today, ChartRange::months(query.months))
        .await?;
    Ok(AppJson(points))
}

async fn recent_activity(
    State(state): State<AppState>,
    _staff: StaffUser,
    AppQuery(query): AppQuery<ActivityQuery>,
) -> ApiResult<AppJson<Vec<ActivityItem>>> {
    let items = DashboardRepository::new(state.db())
        .recent_activity(ChartRange::activity_limit(query.limit))
        .await?;
    Ok(AppJson(items))
}
