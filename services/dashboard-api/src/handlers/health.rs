//! Health and metrics handlers.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub dataset: String,
}

/// GET /health - Basic health check
pub async fn health_handler(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        dataset: state.config.dataset.id.clone(),
    })
}

/// GET /metrics - Prometheus metrics
///
/// Recorder output when one is installed, followed by layer cache gauges.
pub async fn metrics_handler(
    Extension(state): Extension<Arc<AppState>>,
    prometheus: Option<Extension<PrometheusHandle>>,
) -> Response {
    let mut output = prometheus
        .map(|Extension(handle)| handle.render())
        .unwrap_or_default();

    let stats = state.layers.stats();
    output.push_str(&format!(
        "# HELP layer_cache_entries Current map layer cache entries\n# TYPE layer_cache_entries gauge\nlayer_cache_entries {}\n",
        state.layers.len().await
    ));
    output.push_str(&format!(
        "# HELP layer_cache_expired Map layers evicted on expiry\n# TYPE layer_cache_expired counter\nlayer_cache_expired {}\n",
        stats.expired.load(Ordering::Relaxed)
    ));
    output.push_str(&format!(
        "# HELP layer_cache_hit_rate Map layer cache hit rate (percent)\n# TYPE layer_cache_hit_rate gauge\nlayer_cache_hit_rate {:.2}\n",
        stats.hit_rate()
    ));

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        output,
    )
        .into_response()
}
