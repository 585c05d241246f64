//! Place-name geocoding for the location navigator.
//!
//! - [`NominatimClient`] queries an OpenStreetMap Nominatim `/search` endpoint
//! - [`RateLimiter`] spaces outgoing calls by a minimum interval
//! - [`CachingGeocoder`] memoizes results per query and filters

pub mod cache;
pub mod client;
pub mod error;
pub mod rate_limit;
pub mod types;

use async_trait::async_trait;

pub use cache::CachingGeocoder;
pub use client::{NominatimClient, NominatimConfig, DEFAULT_NOMINATIM_URL};
pub use error::GeocodeError;
pub use rate_limit::RateLimiter;
pub use types::{Candidate, FeatureType, SearchQuery};

/// Free-text place search.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Candidates in the service's relevance order; empty when nothing matched.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, GeocodeError>;
}
