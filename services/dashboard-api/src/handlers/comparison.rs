//! Dual-map comparison handlers.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::comparison::{self, ComparisonAction, ComparisonState, DualMapView, RenderContext};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ComparisonRequest {
    /// Absent on first load
    #[serde(default)]
    pub state: Option<ComparisonState>,
    #[serde(default)]
    pub action: Option<ComparisonAction>,
}

#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub state: ComparisonState,
}

/// POST /api/comparison - initial state, or the state after one action
#[instrument(skip_all)]
pub async fn comparison_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<ComparisonRequest>,
) -> Result<Json<ComparisonResponse>, ApiError> {
    let (_, choices) = state.choices().await?;

    let current = match request.state {
        Some(current) => current,
        None => ComparisonState::initial(&choices, state.config.map.initial_viewport())?,
    };

    let next = match request.action {
        Some(action) => {
            debug!(?action, "Applying comparison action");
            current.apply(action, &choices)?
        }
        None => current,
    };

    Ok(Json(ComparisonResponse { state: next }))
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub state: ComparisonState,
}

/// POST /api/comparison/render - both panes; a failed pane carries its error inline
#[instrument(skip_all)]
pub async fn render_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<DualMapView>, ApiError> {
    let table = state.variable_table().await?;
    let map = &state.config.map;

    let ctx = RenderContext {
        dataset_id: &state.config.dataset.id,
        basemap: &map.basemap,
        width_px: map.width_px,
        height_px: map.height_px,
        table: &table,
        compute: state.compute.as_ref(),
        layers: &state.layers,
    };

    Ok(Json(comparison::render(&request.state, &ctx).await))
}
