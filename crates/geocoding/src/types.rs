//! Geocoding queries and results.

use std::collections::BTreeMap;

use era5_common::GeoPoint;
use serde::{Deserialize, Serialize};

/// Nominatim `featuretype` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Country,
    State,
    City,
    Settlement,
}

impl FeatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Country => "country",
            FeatureType::State => "state",
            FeatureType::City => "city",
            FeatureType::Settlement => "settlement",
        }
    }
}

/// Query text plus filters. Also the memoization key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub feature_type: Option<FeatureType>,
    /// Comma-separated ISO 3166-1 alpha-2 codes, lowercase
    pub country_codes: Option<String>,
    pub limit: u8,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            feature_type: None,
            country_codes: None,
            limit: 1,
        }
    }

    /// Best single country match.
    pub fn country(text: impl Into<String>) -> Self {
        Self {
            feature_type: Some(FeatureType::Country),
            ..Self::new(text)
        }
    }

    /// Up to `limit` cities restricted to one country.
    pub fn city_in(text: impl Into<String>, country_code: &str, limit: u8) -> Self {
        Self {
            feature_type: Some(FeatureType::City),
            country_codes: Some(country_code.trim().to_lowercase()),
            limit: limit.max(1),
            ..Self::new(text)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    /// ISO 3166-1 alpha-2, uppercase
    pub country_code: Option<String>,
    #[serde(default)]
    pub address: BTreeMap<String, String>,
}

impl Candidate {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Short place name: the most specific settlement component, else the
    /// first segment of the display name.
    pub fn short_name(&self) -> String {
        for key in ["city", "town", "village", "country"] {
            if let Some(name) = self.address.get(key) {
                return name.clone();
            }
        }
        self.display_name
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}
