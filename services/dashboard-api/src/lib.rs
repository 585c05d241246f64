//! ERA5 Dashboard API Library
//!
//! HTTP server for the ERA5 climate dashboard: side-by-side monthly maps of
//! two variables and a world/continent/country/city drill-down with KPI
//! tiles and a seasonal climatology chart.

pub mod comparison;
pub mod config;
pub mod error;
pub mod handlers;
pub mod layer_cache;
pub mod navigator;
pub mod snapshot_cache;
pub mod state;
pub mod variable_table;
pub mod views;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// All routes with state attached. The Prometheus handle, when present, is
/// layered on by the caller.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Catalog and variables
        .route(
            "/api/catalog/*dataset_id",
            get(handlers::catalog::catalog_handler),
        )
        .route("/api/variables", get(handlers::variables::variables_handler))
        .route("/api/months", get(handlers::variables::months_handler))
        // Dual-map comparison
        .route(
            "/api/comparison",
            post(handlers::comparison::comparison_handler),
        )
        .route(
            "/api/comparison/render",
            post(handlers::comparison::render_handler),
        )
        // Location drill-down
        .route("/api/navigator", post(handlers::navigator::navigator_handler))
        .route("/api/view", post(handlers::view::view_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
