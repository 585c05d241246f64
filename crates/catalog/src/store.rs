//! Catalog persistence.
//!
//! The cache file is a single JSON object keyed by dataset id. It is read if
//! present and rewritten whole when a dataset is added. Concurrent processes
//! writing the same dataset race; the last writer wins.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::entry::Catalog;
use crate::error::CatalogError;

/// Storage for per-dataset catalogs.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Cached catalog for a dataset, if any.
    async fn load(&self, dataset_id: &str) -> Result<Option<Catalog>, CatalogError>;

    /// Persist the catalog for a dataset, replacing any previous one.
    async fn save(&self, dataset_id: &str, catalog: &Catalog) -> Result<(), CatalogError>;
}

type CacheDocument = BTreeMap<String, Catalog>;

/// JSON cache file on local disk.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<CacheDocument, CatalogError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(CacheDocument::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CacheDocument::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl CatalogStore for JsonFileStore {
    async fn load(&self, dataset_id: &str) -> Result<Option<Catalog>, CatalogError> {
        let mut document = self.read_document().await?;
        let catalog = document.remove(dataset_id);
        debug!(
            dataset_id,
            hit = catalog.is_some(),
            path = %self.path.display(),
            "Catalog cache lookup"
        );
        Ok(catalog)
    }

    async fn save(&self, dataset_id: &str, catalog: &Catalog) -> Result<(), CatalogError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await?;
        document.insert(dataset_id.to_string(), catalog.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Atomic replace: write a sibling temp file, then rename.
        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(&document)?;
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        info!(
            dataset_id,
            variables = catalog.len(),
            path = %self.path.display(),
            "Catalog cached"
        );
        Ok(())
    }
}

/// In-process store.
#[derive(Default)]
pub struct MemoryStore {
    catalogs: RwLock<HashMap<String, Catalog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, dataset_id: &str) -> bool {
        self.catalogs.read().await.contains_key(dataset_id)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn load(&self, dataset_id: &str) -> Result<Option<Catalog>, CatalogError> {
        Ok(self.catalogs.read().await.get(dataset_id).cloned())
    }

    async fn save(&self, dataset_id: &str, catalog: &Catalog) -> Result<(), CatalogError> {
        self.catalogs
            .write()
            .await
            .insert(dataset_id.to_string(), catalog.clone());
        Ok(())
    }
}
