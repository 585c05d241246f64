//! Short-lived cache for the dataset snapshot: live band names and the
//! available time extent.
//!
//! Both are cheap to recompute but sit on the path of every variable list
//! and render, so they are held for a short TTL.

use std::time::{Duration, Instant};

use compute_client::TimeExtent;
use tokio::sync::RwLock;
use tracing::{debug, info};

struct Cached<T> {
    value: T,
    generated_at: Instant,
}

pub struct SnapshotCache {
    bands: RwLock<Option<Cached<Vec<String>>>>,
    extent: RwLock<Option<Cached<TimeExtent>>>,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(ttl_secs: u64) -> Self {
        info!(ttl_secs = ttl_secs, "Initializing dataset snapshot cache");
        Self {
            bands: RwLock::new(None),
            extent: RwLock::new(None),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    pub async fn get_bands(&self) -> Option<Vec<String>> {
        let guard = self.bands.read().await;
        if let Some(cached) = guard.as_ref() {
            if cached.generated_at.elapsed() < self.ttl {
                debug!("Band list cache hit");
                return Some(cached.value.clone());
            }
            debug!("Band list cache expired");
        }
        None
    }

    pub async fn set_bands(&self, bands: Vec<String>) {
        *self.bands.write().await = Some(Cached {
            value: bands,
            generated_at: Instant::now(),
        });
    }

    pub async fn get_extent(&self) -> Option<TimeExtent> {
        let guard = self.extent.read().await;
        if let Some(cached) = guard.as_ref() {
            if cached.generated_at.elapsed() < self.ttl {
                debug!("Time extent cache hit");
                return Some(cached.value);
            }
            debug!("Time extent cache expired");
        }
        None
    }

    pub async fn set_extent(&self, extent: TimeExtent) {
        *self.extent.write().await = Some(Cached {
            value: extent,
            generated_at: Instant::now(),
        });
    }

    pub async fn invalidate(&self) {
        *self.bands.write().await = None;
        *self.extent.write().await = None;
        debug!("Snapshot cache invalidated");
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs()
    }
}
