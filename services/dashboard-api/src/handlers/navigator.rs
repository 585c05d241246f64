//! Location drill-down handler.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::navigator::{LocationSelection, NavigatorAction, NavigatorState};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NavigatorRequest {
    #[serde(default)]
    pub state: NavigatorState,
    #[serde(default)]
    pub action: Option<NavigatorAction>,
}

#[derive(Debug, Serialize)]
pub struct NavigatorResponse {
    pub state: NavigatorState,
    pub selection: LocationSelection,
    /// Why the action was rejected; the state is then unchanged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// POST /api/navigator
///
/// Rejected input is not an HTTP error: the caller gets its state back with
/// a warning to show next to the search box.
#[instrument(skip_all)]
pub async fn navigator_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<NavigatorRequest>,
) -> Json<NavigatorResponse> {
    let (next, warning) = match request.action {
        Some(action) => match state.navigator.apply(&request.state, action).await {
            Ok(next) => (next, None),
            Err(e) => {
                info!(error = %e, depth = request.state.depth.name(), "Navigation rejected");
                (request.state, Some(e.to_string()))
            }
        },
        None => (request.state, None),
    };

    Json(NavigatorResponse {
        selection: next.selection(),
        state: next,
        warning,
    })
}
