use era5_common::DashboardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoder returned HTTP {status}")]
    Http { status: u16 },

    #[error("Malformed geocoder response: {0}")]
    InvalidResponse(String),

    #[error("Empty query")]
    EmptyQuery,
}

impl From<GeocodeError> for DashboardError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::EmptyQuery => DashboardError::MissingParameter("query".to_string()),
            e => DashboardError::remote("geocoder", e),
        }
    }
}
