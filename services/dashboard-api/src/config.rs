//! Dashboard configuration loading and types.
//!
//! Settings come from an optional YAML file (`config/dashboard.yaml` by
//! default). Every section has defaults, so a missing file or a partial one
//! is fine. Endpoints can be overridden from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use era5_common::{GeoPoint, Viewport};
use serde::{Deserialize, Serialize};
use variables::{curated::default_curated, CuratedVariable, Denylist};

pub const COMPUTE_BASE_URL_ENV: &str = "COMPUTE_BASE_URL";
pub const GEOCODER_URL_ENV: &str = "GEOCODER_URL";
pub const CATALOG_CACHE_PATH_ENV: &str = "CATALOG_CACHE_PATH";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub dataset: DatasetConfig,
    pub catalog: CatalogConfig,
    pub compute: ComputeConfig,
    pub geocoder: GeocoderConfig,
    pub variables: VariablesConfig,
    pub map: MapConfig,
    pub cache: CacheConfig,
    pub views: ViewsConfig,
}

/// The dataset offered in the comparison view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub id: String,
    pub curated: Vec<CuratedVariable>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            id: "ECMWF/ERA5_LAND/MONTHLY_AGGR".to_string(),
            curated: default_curated(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub cache_path: PathBuf,
    pub docs_base_url: String,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from("data/catalog_cache.json"),
            docs_base_url: catalog::fetcher::DEFAULT_DOCS_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub attribution: String,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".to_string(),
            timeout_secs: 60,
            attribution: "Google Earth Engine / ERA5-Land".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Minimum spacing between requests
    pub min_interval_ms: u64,
    pub timeout_secs: u64,
    /// Candidates requested for a city search
    pub city_limit: u8,
    pub cache_capacity: usize,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: geocoding::DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: "era5-dashboard/0.1".to_string(),
            min_interval_ms: 1000,
            timeout_secs: 10,
            city_limit: 5,
            cache_capacity: 512,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariablesConfig {
    pub denylist: Denylist,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub basemap: String,
    pub center: GeoPoint,
    pub zoom: u8,
    /// Pane size used to report visible bounds
    pub width_px: u32,
    pub height_px: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            basemap: "CartoDB positron".to_string(),
            center: viewport.center,
            zoom: viewport.zoom,
            width_px: 800,
            height_px: 600,
        }
    }
}

impl MapConfig {
    pub fn initial_viewport(&self) -> Viewport {
        Viewport::new(self.center, self.zoom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub layer_capacity: usize,
    pub layer_ttl_secs: u64,
    /// TTL for the live band list and time extent
    pub snapshot_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            layer_capacity: 256,
            layer_ttl_secs: 3600,
            snapshot_ttl_secs: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewsConfig {
    /// Calendar year KPI values are reduced over
    pub kpi_year: i32,
    pub climatology_start: i32,
    /// Inclusive
    pub climatology_end: i32,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            kpi_year: 2024,
            climatology_start: 1991,
            climatology_end: 2020,
        }
    }
}

impl DashboardConfig {
    /// Load from a YAML file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Dashboard config file does not exist, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse dashboard config: {:?}", path))?;

        tracing::info!(
            path = %path.display(),
            dataset = %config.dataset.id,
            curated = config.dataset.curated.len(),
            denylist = config.variables.denylist.patterns().len(),
            "Loaded dashboard config"
        );
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(COMPUTE_BASE_URL_ENV) {
            self.compute.base_url = url;
        }
        if let Some(url) = lookup(GEOCODER_URL_ENV) {
            self.geocoder.base_url = url;
        }
        if let Some(path) = lookup(CATALOG_CACHE_PATH_ENV) {
            self.catalog.cache_path = PathBuf::from(path);
        }
    }

    pub fn compute_timeout(&self) -> Duration {
        Duration::from_secs(self.compute.timeout_secs)
    }
}
