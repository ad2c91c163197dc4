//! Expense API endpoints

use api_types::{
    RecordCreated,
    expense::{ExpenseListResponse, ExpenseNew},
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
    views::{expense_view, group_totals, new_expense},
};

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let report = state.engine.expense_report().await?;

    Ok(Json(ExpenseListResponse {
        expenses: report.expenses.into_iter().map(expense_view).collect(),
        total_minor: report.total.cents(),
        category_totals: group_totals(report.category_totals),
        excluded: report.excluded,
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<RecordCreated>), ServerError> {
    let id = state.engine.add_expense(new_expense(payload)).await?;
    Ok((StatusCode::CREATED, Json(RecordCreated { id })))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
