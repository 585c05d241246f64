//! Compute service errors.

use era5_common::DashboardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Compute service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid credentials: {0}")]
    Credentials(String),

    #[error("No data for band {band} in {month}")]
    NoData { band: String, month: String },

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl From<ComputeError> for DashboardError {
    fn from(err: ComputeError) -> Self {
        match err {
            ComputeError::NoData { band, month } => DashboardError::DataNotAvailable { band, month },
            e => DashboardError::remote("compute", e),
        }
    }
}
