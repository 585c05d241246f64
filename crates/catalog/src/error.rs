//! Catalog errors.

use era5_common::DashboardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Documentation page returned HTTP {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Catalog parse error: {0}")]
    Parse(String),

    #[error("Cache file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CatalogError> for DashboardError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Parse(msg) => DashboardError::CatalogParse(msg),
            CatalogError::Request(e) => DashboardError::remote("catalog", e),
            e @ CatalogError::Http { .. } => DashboardError::remote("catalog", e),
            e => DashboardError::CacheError(e.to_string()),
        }
    }
}
