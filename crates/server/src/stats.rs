//! Statistics and dashboard API endpoints

use api_types::{
    dashboard::{DashboardQuery, DashboardResponse},
    income::IncomeView,
    stats::{StatsResponse, StatsSummary},
};
use axum::{
    Json,
    extract::{Query, State},
};
use engine::DEFAULT_ACTIVITY_LIMIT;

use crate::{
    ServerError,
    server::ServerState,
    views::{activity_view, contributors, group_totals, income_view, summary},
};

/// Handle requests for the fund statistics
pub async fn get_stats(
    State(state): State<ServerState>,
) -> Result<Json<StatsResponse>, ServerError> {
    let report = state.engine.stats().await?;

    Ok(Json(StatsResponse {
        batch_stats: group_totals(report.batch_stats),
        account_stats: group_totals(report.account_stats),
        top_contributors: contributors(report.top_contributors),
        recent_activity: report.recent_activity.into_iter().map(income_view).collect(),
        summary: StatsSummary {
            total_minor: report.summary.total.cents(),
            batch_minor: report.summary.batch.cents(),
            external_minor: report.summary.external.cents(),
        },
        excluded: report.excluded,
    }))
}

/// Every income, largest amount first.
pub async fn get_details(
    State(state): State<ServerState>,
) -> Result<Json<Vec<IncomeView>>, ServerError> {
    let incomes = state.engine.incomes_by_amount().await?;
    Ok(Json(incomes.into_iter().map(income_view).collect()))
}

pub async fn get_dashboard(
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, ServerError> {
    let limit = query.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
    let dashboard = state.engine.dashboard(limit).await?;

    Ok(Json(DashboardResponse {
        summary: summary(dashboard.summary),
        activity: dashboard.activity.into_iter().map(activity_view).collect(),
        top_contributors: contributors(dashboard.top_contributors),
        excluded: dashboard.excluded,
    }))
}
