//! Application state for the dashboard API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use catalog::{get_catalog, Catalog, CatalogError, CatalogStore, JsonFileStore, PageFetcher};
use compute_client::{ComputeError, ComputeService, HttpComputeConfig, HttpComputeService, ServiceAccount};
use era5_common::{DashboardError, YearMonth};
use geocoding::{CachingGeocoder, Geocoder, NominatimClient, NominatimConfig};
use tracing::{info, warn};

use crate::comparison::Choices;
use crate::config::DashboardConfig;
use crate::layer_cache::LayerCache;
use crate::navigator::Navigator;
use crate::snapshot_cache::SnapshotCache;
use crate::variable_table::VariableTable;

/// Shared application state.
pub struct AppState {
    pub config: DashboardConfig,

    /// Remote geospatial compute backend.
    pub compute: Arc<dyn ComputeService>,

    pub navigator: Navigator,

    /// Persisted per-dataset catalogs.
    pub catalog_store: Arc<dyn CatalogStore>,
    pub page_fetcher: PageFetcher,

    pub layers: LayerCache,
    pub snapshot: SnapshotCache,
}

impl AppState {
    /// Build the production services from configuration.
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let credentials =
            ServiceAccount::from_env().context("Failed to load compute credentials")?;
        if credentials.is_none() {
            warn!("No compute credentials configured, requests will be unauthenticated");
        }

        let compute = HttpComputeService::new(
            HttpComputeConfig {
                base_url: config.compute.base_url.clone(),
                request_timeout: config.compute_timeout(),
                attribution: config.compute.attribution.clone(),
            },
            credentials,
        )
        .context("Failed to create compute client")?;

        let nominatim = NominatimClient::new(NominatimConfig {
            base_url: config.geocoder.base_url.clone(),
            user_agent: config.geocoder.user_agent.clone(),
            min_interval: Duration::from_millis(config.geocoder.min_interval_ms),
            request_timeout: Duration::from_secs(config.geocoder.timeout_secs),
        })
        .context("Failed to create geocoding client")?;
        let geocoder = CachingGeocoder::new(nominatim, config.geocoder.cache_capacity);

        let store = JsonFileStore::new(config.catalog.cache_path.clone());

        info!(
            compute = %config.compute.base_url,
            geocoder = %config.geocoder.base_url,
            catalog_cache = %config.catalog.cache_path.display(),
            "Initialized remote services"
        );

        Self::with_services(config, Arc::new(compute), Arc::new(geocoder), Arc::new(store))
    }

    /// Assemble state around the given service implementations.
    pub fn with_services(
        config: DashboardConfig,
        compute: Arc<dyn ComputeService>,
        geocoder: Arc<dyn Geocoder>,
        catalog_store: Arc<dyn CatalogStore>,
    ) -> Result<Self> {
        let page_fetcher = PageFetcher::new(
            config.catalog.docs_base_url.clone(),
            Duration::from_secs(config.catalog.timeout_secs),
        )
        .context("Failed to create documentation page fetcher")?;

        Ok(Self {
            navigator: Navigator::new(geocoder, config.geocoder.city_limit),
            layers: LayerCache::new(config.cache.layer_capacity, config.cache.layer_ttl_secs),
            snapshot: SnapshotCache::new(config.cache.snapshot_ttl_secs),
            compute,
            catalog_store,
            page_fetcher,
            config,
        })
    }

    /// Catalog for a dataset, scraped and cached on first use.
    pub async fn catalog(&self, dataset_id: &str) -> Result<Catalog, CatalogError> {
        let fetcher = &self.page_fetcher;
        get_catalog(dataset_id, self.catalog_store.as_ref(), |id| async move {
            fetcher.fetch(&id).await
        })
        .await
    }

    /// Band names of the configured dataset's current snapshot.
    pub async fn live_bands(&self) -> Result<Vec<String>, ComputeError> {
        if let Some(bands) = self.snapshot.get_bands().await {
            return Ok(bands);
        }
        let bands = self.compute.band_names(&self.config.dataset.id).await?;
        self.snapshot.set_bands(bands.clone()).await;
        Ok(bands)
    }

    /// Every month with imagery in the configured dataset, oldest first.
    pub async fn available_months(&self) -> Result<Vec<YearMonth>, ComputeError> {
        let extent = match self.snapshot.get_extent().await {
            Some(extent) => extent,
            None => {
                let extent = self.compute.time_extent(&self.config.dataset.id).await?;
                self.snapshot.set_extent(extent).await;
                extent
            }
        };
        Ok(extent.months())
    }

    /// Selectable variables for the configured dataset.
    pub async fn variable_table(&self) -> Result<VariableTable, DashboardError> {
        let (catalog, bands) = futures::join!(self.catalog(&self.config.dataset.id), self.live_bands());
        let (catalog, bands) = (catalog?, bands?);

        let table = VariableTable::build(
            &self.config.dataset.curated,
            &self.config.variables.denylist,
            &catalog,
            &bands,
        );
        if !table.missing.is_empty() {
            warn!(missing = ?table.missing, "Curated variables unavailable in dataset");
        }
        Ok(table)
    }

    /// Variable table plus what the comparison panes may select.
    pub async fn choices(&self) -> Result<(VariableTable, Choices), DashboardError> {
        let (table, months) = futures::join!(self.variable_table(), self.available_months());
        let table = table?;
        let choices = Choices::new(&table, months?);
        Ok((table, choices))
    }
}
