//! Error types for the ERA5 dashboard.

use thiserror::Error;

/// Result type alias using DashboardError.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Primary error type surfaced by the dashboard service.
#[derive(Debug, Error)]
pub enum DashboardError {
    // === Request Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    // === Data Errors ===
    #[error("No data available for {band} in {month}")]
    DataNotAvailable { band: String, month: String },

    #[error("Location lies outside the selected continent: {0}")]
    GeographicMismatch(String),

    #[error("Failed to parse dataset catalog: {0}")]
    CatalogParse(String),

    // === Remote Service Errors ===
    #[error("Remote service error ({service}): {message}")]
    RemoteService { service: String, message: String },

    #[error("Cache error: {0}")]
    CacheError(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl DashboardError {
    /// Build a remote service error for the named collaborator.
    pub fn remote(service: impl Into<String>, message: impl ToString) -> Self {
        DashboardError::RemoteService {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// Short machine-readable code used in JSON error bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::MissingParameter(_) => "MissingParameter",
            DashboardError::InvalidParameter { .. } => "InvalidParameter",
            DashboardError::InvalidMonth(_) => "InvalidMonth",
            DashboardError::UnknownVariable(_) => "UnknownVariable",
            DashboardError::DataNotAvailable { .. } => "DataNotAvailable",
            DashboardError::GeographicMismatch(_) => "GeographicMismatch",
            DashboardError::CatalogParse(_) => "CatalogParseError",
            DashboardError::RemoteService { .. } => "RemoteServiceError",
            _ => "InternalError",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            DashboardError::MissingParameter(_)
            | DashboardError::InvalidParameter { .. }
            | DashboardError::InvalidMonth(_) => 400,

            DashboardError::UnknownVariable(_) | DashboardError::DataNotAvailable { .. } => 404,

            DashboardError::GeographicMismatch(_) => 422,

            DashboardError::CatalogParse(_) | DashboardError::RemoteService { .. } => 502,

            _ => 500,
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::InternalError(format!("JSON error: {}", err))
    }
}
