//! Dashboard view handler.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use serde::Deserialize;
use tracing::instrument;

use crate::error::ApiError;
use crate::navigator::NavigatorState;
use crate::state::AppState;
use crate::views::{build_view, DashboardView};

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    #[serde(default)]
    pub navigator: NavigatorState,
}

/// POST /api/view - KPI tiles and seasonal chart for the navigator's depth
#[instrument(skip_all)]
pub async fn view_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<ViewRequest>,
) -> Result<Json<DashboardView>, ApiError> {
    let view = build_view(
        state.compute.as_ref(),
        &request.navigator.depth,
        &state.config.views,
        state.config.map.initial_viewport(),
    )
    .await?;
    Ok(Json(view))
}
