//! Nominatim `/search` client.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::GeocodeError;
use crate::rate_limit::RateLimiter;
use crate::types::{Candidate, SearchQuery};
use crate::Geocoder;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim rejects requests without an identifying agent.
    pub user_agent: String,
    pub min_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: "era5-dashboard/0.1".to_string(),
            min_interval: crate::rate_limit::DEFAULT_MIN_INTERVAL,
            request_timeout: Duration::from_secs(10),
        }
    }
}

pub struct NominatimClient {
    client: Client,
    base_url: String,
    limiter: RateLimiter,
}

/// One element of a `format=jsonv2` response. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: BTreeMap<String, String>,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::new(config.min_interval),
        })
    }

    fn query_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.text.clone()),
            ("format", "jsonv2".to_string()),
            ("addressdetails", "1".to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(feature) = query.feature_type {
            params.push(("featuretype", feature.as_str().to_string()));
        }
        if let Some(codes) = &query.country_codes {
            params.push(("countrycodes", codes.clone()));
        }
        params
    }
}

/// Parse a `format=jsonv2` search response body.
pub fn parse_search_response(body: &str) -> Result<Vec<Candidate>, GeocodeError> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

    places
        .into_iter()
        .map(|place| {
            let lat = place.lat.parse::<f64>().map_err(|_| {
                GeocodeError::InvalidResponse(format!("bad latitude '{}'", place.lat))
            })?;
            let lon = place.lon.parse::<f64>().map_err(|_| {
                GeocodeError::InvalidResponse(format!("bad longitude '{}'", place.lon))
            })?;
            let country_code = place.address.get("country_code").map(|c| c.to_uppercase());

            Ok(Candidate {
                display_name: place.display_name,
                lat,
                lon,
                country_code,
                address: place.address,
            })
        })
        .collect()
}

#[async_trait]
impl Geocoder for NominatimClient {
    #[instrument(skip(self), fields(q = %query.text))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, GeocodeError> {
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        self.limiter.acquire().await;
        counter!("geocode_requests_total").increment(1);

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&Self::query_params(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            counter!("geocode_errors_total").increment(1);
            return Err(GeocodeError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let candidates = parse_search_response(&body)?;
        debug!(matches = candidates.len(), "Geocoder search complete");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeatureType;

    const PARIS: &str = r#"[{
        "place_id": 88066702,
        "lat": "48.8588897",
        "lon": "2.3200410",
        "category": "boundary",
        "type": "administrative",
        "display_name": "Paris, Île-de-France, France métropolitaine, France",
        "address": {"city": "Paris", "state": "Île-de-France", "country": "France", "country_code": "fr"}
    }]"#;

    #[test]
    fn test_parse_search_response() {
        let candidates = parse_search_response(PARIS).unwrap();
        assert_eq!(candidates.len(), 1);
        let paris = &candidates[0];
        assert!((paris.lat - 48.8588897).abs() < 1e-9);
        assert_eq!(paris.country_code.as_deref(), Some("FR"));
        assert_eq!(paris.short_name(), "Paris");
    }

    #[test]
    fn test_parse_empty_and_malformed() {
        assert!(parse_search_response("[]").unwrap().is_empty());
        assert!(matches!(
            parse_search_response(r#"{"error":"bad"}"#),
            Err(GeocodeError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_search_response(r#"[{"lat":"north","lon":"1","display_name":"x"}]"#),
            Err(GeocodeError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_query_params() {
        let query = SearchQuery::city_in("Springfield", "us", 5);
        let params = NominatimClient::query_params(&query);
        assert!(params.contains(&("format", "jsonv2".to_string())));
        assert!(params.contains(&("addressdetails", "1".to_string())));
        assert!(params.contains(&("limit", "5".to_string())));
        assert!(params.contains(&("featuretype", FeatureType::City.as_str().to_string())));
        assert!(params.contains(&("countrycodes", "us".to_string())));
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_request() {
        let client = NominatimClient::new(NominatimConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        })
        .unwrap();
        let result = client.search(&SearchQuery::new("  ")).await;
        assert!(matches!(result, Err(GeocodeError::EmptyQuery)));
    }
}
