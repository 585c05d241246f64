//! Fetch-if-not-cached catalog retrieval.

use std::future::Future;
use std::time::Duration;

use metrics::counter;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::entry::{build_catalog, Catalog};
use crate::error::CatalogError;
use crate::parser::parse_band_table;
use crate::store::CatalogStore;

/// Public documentation pages for Earth Engine datasets.
pub const DEFAULT_DOCS_BASE_URL: &str = "https://developers.google.com/earth-engine/datasets/catalog";

/// Catalog for `dataset_id`.
///
/// A cached catalog is returned unchanged. Otherwise `fetch` is called for
/// the page HTML, which is parsed, classified and saved before returning.
/// Nothing is saved when fetching or parsing fails.
pub async fn get_catalog<S, F, Fut>(
    dataset_id: &str,
    store: &S,
    fetch: F,
) -> Result<Catalog, CatalogError>
where
    S: CatalogStore + ?Sized,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String, CatalogError>>,
{
    if let Some(cached) = store.load(dataset_id).await? {
        counter!("catalog_cache_hits_total").increment(1);
        debug!(dataset_id, variables = cached.len(), "Catalog served from cache");
        return Ok(cached);
    }

    counter!("catalog_fetches_total").increment(1);
    let html = fetch(dataset_id.to_string()).await?;
    let rows = parse_band_table(&html).map_err(|e| {
        warn!(dataset_id, error = %e, "Documentation page has no band table");
        e
    })?;

    let catalog = build_catalog(&rows);
    store.save(dataset_id, &catalog).await?;

    info!(dataset_id, variables = catalog.len(), "Catalog built");
    Ok(catalog)
}

/// Downloads dataset documentation pages.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    base_url: String,
}

impl PageFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Documentation URL; slashes in the dataset id become underscores.
    pub fn page_url(&self, dataset_id: &str) -> String {
        format!("{}/{}", self.base_url, dataset_id.replace('/', "_"))
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, dataset_id: &str) -> Result<String, CatalogError> {
        let url = self.page_url(dataset_id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Http {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.text().await?)
    }
}
