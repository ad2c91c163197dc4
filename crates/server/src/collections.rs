//! Batch collection API endpoints

use api_types::collections::{CollectionDetailResponse, CollectionsResponse};
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    ServerError,
    server::ServerState,
    views::{group_totals, income_view},
};

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<CollectionsResponse>, ServerError> {
    let overview = state.engine.collections().await?;

    Ok(Json(CollectionsResponse {
        batches: group_totals(overview.value.batches),
        external_sponsors_minor: overview.value.external_sponsors.cents(),
        excluded: overview.excluded,
    }))
}

/// Records of one batch, or of every external sponsor for the
/// "External Sponsors" label.
pub async fn detail(
    State(state): State<ServerState>,
    Path(label): Path<String>,
) -> Result<Json<CollectionDetailResponse>, ServerError> {
    if label.trim().is_empty() {
        return Err(ServerError::Generic(
            "collection label must not be empty".to_string(),
        ));
    }

    let detail = state.engine.collection_detail(&label).await?;
    let excluded = detail.excluded;
    let detail = detail.value;

    Ok(Json(CollectionDetailResponse {
        label: detail.label,
        records: detail.records.into_iter().map(income_view).collect(),
        count: detail.count,
        total_minor: detail.total.cents(),
        excluded,
    }))
}
