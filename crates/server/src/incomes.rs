//! Income API endpoints

use api_types::{
    RecordCreated,
    income::{IncomeListResponse, IncomeNew},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    server::ServerState,
    views::{breakdown, contributors, group_totals, income_view, new_income},
};

/// Every income, newest first, with the income-side totals.
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<IncomeListResponse>, ServerError> {
    let report = state.engine.income_report().await?;

    Ok(Json(IncomeListResponse {
        incomes: report.incomes.into_iter().map(income_view).collect(),
        batch_totals: group_totals(report.batch_totals),
        payment_method_totals: group_totals(report.payment_method_totals),
        top_contributors: contributors(report.top_contributors),
        breakdown: breakdown(report.breakdown),
        excluded: report.excluded,
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<IncomeNew>,
) -> Result<(StatusCode, Json<RecordCreated>), ServerError> {
    let id = state.engine.add_income(new_income(payload)).await?;
    Ok((StatusCode::CREATED, Json(RecordCreated { id })))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(income_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_income(income_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
