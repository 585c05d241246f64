//! Dataset catalog handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};
use catalog::CatalogEntry;
use era5_common::DashboardError;
use serde::Serialize;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CatalogResponse {
    pub dataset_id: String,
    pub variables: Vec<CatalogEntry>,
}

/// GET /api/catalog/*dataset_id
///
/// Dataset ids contain slashes, so the route captures the rest of the path.
#[instrument(skip(state))]
pub async fn catalog_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(dataset_id): Path<String>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let dataset_id = dataset_id.trim_matches('/').to_string();
    if dataset_id.is_empty() {
        return Err(DashboardError::MissingParameter("dataset_id".to_string()).into());
    }

    let catalog = state
        .catalog(&dataset_id)
        .await
        .map_err(DashboardError::from)?;

    Ok(Json(CatalogResponse {
        dataset_id,
        variables: catalog.into_values().collect(),
    }))
}
