//! In-memory cache for monthly map layers.
//!
//! Map layers are idempotent per (dataset, band, month), so they are memoized
//! for the life of the process with an LRU bound and a TTL (tile URLs issued
//! by the compute service eventually expire).
//!
//! Failed fetches are not cached. Concurrent misses on one key wait for the
//! first fetch instead of issuing their own.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use compute_client::{ComputeError, TileLayer};
use era5_common::YearMonth;
use lru::LruCache;
use metrics::counter;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct LayerKey {
    pub dataset_id: String,
    pub band: String,
    pub month: YearMonth,
}

impl LayerKey {
    pub fn new(dataset_id: impl Into<String>, band: impl Into<String>, month: YearMonth) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            band: band.into(),
            month,
        }
    }
}

struct CachedLayer {
    layer: TileLayer,
    inserted_at: Instant,
}

#[derive(Default)]
pub struct LayerCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub expired: AtomicU64,
}

impl LayerCacheStats {
    /// Cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

pub struct LayerCache {
    cache: RwLock<LruCache<LayerKey, CachedLayer>>,
    /// Per-key guards held while a fetch is running
    in_flight: Mutex<HashMap<LayerKey, Arc<Mutex<()>>>>,
    ttl: Duration,
    stats: LayerCacheStats,
}

impl LayerCache {
    pub fn new(capacity: usize, ttl_secs: u64) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        tracing::info!(capacity = capacity.get(), ttl_secs, "LayerCache initialized");
        Self {
            cache: RwLock::new(LruCache::new(capacity)),
            in_flight: Mutex::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
            stats: LayerCacheStats::default(),
        }
    }

    pub async fn get(&self, key: &LayerKey) -> Option<TileLayer> {
        let mut cache = self.cache.write().await;

        let expired = match cache.get(key) {
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                counter!("layer_cache_hits_total").increment(1);
                return Some(entry.layer.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            cache.pop(key);
            self.stats.expired.fetch_add(1, Ordering::Relaxed);
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        counter!("layer_cache_misses_total").increment(1);
        None
    }

    /// Fresh entry for `key` without counting a miss.
    async fn fresh(&self, key: &LayerKey) -> Option<TileLayer> {
        let mut cache = self.cache.write().await;
        match cache.get(key) {
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                counter!("layer_cache_hits_total").increment(1);
                Some(entry.layer.clone())
            }
            _ => None,
        }
    }

    pub async fn put(&self, key: LayerKey, layer: TileLayer) {
        self.cache.write().await.put(
            key,
            CachedLayer {
                layer,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Cached layer for `key`, or the result of `fetch`, which is stored on
    /// success. The cache lock is not held while fetching; the key's
    /// in-flight guard is, so a concurrent caller for the same key reuses
    /// the result.
    pub async fn get_or_fetch<F, Fut>(&self, key: LayerKey, fetch: F) -> Result<TileLayer, ComputeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TileLayer, ComputeError>>,
    {
        if let Some(layer) = self.get(&key).await {
            return Ok(layer);
        }

        let slot = self
            .in_flight
            .lock()
            .await
            .entry(key.clone())
            .or_default()
            .clone();
        let _guard = slot.lock().await;

        // Filled by another caller while we waited.
        if let Some(layer) = self.fresh(&key).await {
            return Ok(layer);
        }

        let result = fetch().await;
        if let Ok(layer) = &result {
            tracing::debug!(band = %key.band, month = %key.month, "Caching map layer");
            self.put(key.clone(), layer.clone()).await;
        }
        self.in_flight.lock().await.remove(&key);
        result
    }

    pub fn stats(&self) -> &LayerCacheStats {
        &self.stats
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        let count = cache.len();
        cache.clear();
        tracing::info!("LayerCache cleared {} entries", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(band: &str, month: u32) -> LayerKey {
        LayerKey::new("ECMWF/ERA5_LAND/MONTHLY_AGGR", band, YearMonth::new(2020, month).unwrap())
    }

    fn layer(url: &str) -> TileLayer {
        TileLayer {
            url_template: url.to_string(),
            attribution: "GEE".to_string(),
        }
    }

    #[tokio::test]
    async fn test_cache_put_get() {
        let cache = LayerCache::new(8, 300);
        cache.put(key("temperature_2m", 1), layer("a")).await;

        assert_eq!(cache.get(&key("temperature_2m", 1)).await, Some(layer("a")));
        assert_eq!(cache.get(&key("temperature_2m", 2)).await, None);
        assert_eq!(cache.stats().hits.load(Ordering::Relaxed), 1);
        assert_eq!(cache.stats().misses.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_get_or_fetch_memoizes() {
        let cache = LayerCache::new(8, 300);
        let mut calls = 0;

        for _ in 0..3 {
            let result = cache
                .get_or_fetch(key("snow_depth", 6), || {
                    calls += 1;
                    async { Ok(layer("snow")) }
                })
                .await
                .unwrap();
            assert_eq!(result.url_template, "snow");
        }
        assert_eq!(calls, 1);
        assert!((cache.stats().hit_rate() - 66.66).abs() < 1.0);
    }

    #[tokio::test]
    async fn test_failures_not_cached() {
        let cache = LayerCache::new(8, 300);
        let result = cache
            .get_or_fetch(key("runoff_sum", 1), || async {
                Err(ComputeError::InvalidResponse("boom".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_expired_entries_are_refetched() {
        let cache = LayerCache::new(8, 0);
        cache.put(key("temperature_2m", 1), layer("a")).await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(cache.get(&key("temperature_2m", 1)).await, None);
        assert_eq!(cache.stats().expired.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_fetch_once() {
        let cache = LayerCache::new(8, 300);
        let calls = AtomicU64::new(0);
        let seen = &calls;
        let fetch = move || async move {
            seen.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, ComputeError>(layer("t2m"))
        };

        let (a, b) = futures::join!(
            cache.get_or_fetch(key("temperature_2m", 7), fetch),
            cache.get_or_fetch(key("temperature_2m", 7), fetch),
        );

        assert_eq!(a.unwrap(), layer("t2m"));
        assert_eq!(b.unwrap(), layer("t2m"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.in_flight.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_waiter_retries_after_failed_fetch() {
        let cache = LayerCache::new(8, 300);
        let calls = AtomicU64::new(0);
        let seen = &calls;
        let fetch = move || async move {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            if n == 0 {
                Err(ComputeError::InvalidResponse("quota".to_string()))
            } else {
                Ok(layer("retry"))
            }
        };

        let (a, b) = futures::join!(
            cache.get_or_fetch(key("runoff_sum", 3), fetch),
            cache.get_or_fetch(key("runoff_sum", 3), fetch),
        );

        assert!(a.is_err());
        assert_eq!(b.unwrap(), layer("retry"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lru_bound() {
        let cache = LayerCache::new(2, 300);
        cache.put(key("a", 1), layer("1")).await;
        cache.put(key("a", 2), layer("2")).await;
        cache.put(key("a", 3), layer("3")).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get(&key("a", 1)).await, None);
    }
}
