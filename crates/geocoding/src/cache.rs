//! Per-query memoization in front of any [`Geocoder`].

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use lru::LruCache;
use metrics::counter;
use tokio::sync::Mutex;

use crate::error::GeocodeError;
use crate::types::{Candidate, SearchQuery};
use crate::Geocoder;

const DEFAULT_CAPACITY: usize = 512;

/// Successful results are cached; errors are not, so a transient failure
/// can be retried. Misses are looked up one at a time, so concurrent
/// identical queries reach the inner geocoder once.
pub struct CachingGeocoder<G> {
    inner: G,
    cache: Mutex<LruCache<SearchQuery, Vec<Candidate>>>,
    lookup: Mutex<()>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<G: Geocoder> CachingGeocoder<G> {
    pub fn new(inner: G, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            lookup: Mutex::new(()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    async fn cached(&self, query: &SearchQuery) -> Option<Vec<Candidate>> {
        let cached = self.cache.lock().await.get(query).cloned()?;
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("geocode_cache_hits_total").increment(1);
        Some(cached)
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl<G: Geocoder> Geocoder for CachingGeocoder<G> {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, GeocodeError> {
        if let Some(cached) = self.cached(query).await {
            return Ok(cached);
        }

        let _lookup = self.lookup.lock().await;
        // Answered by a concurrent lookup while we waited.
        if let Some(cached) = self.cached(query).await {
            return Ok(cached);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let candidates = self.inner.search(query).await?;
        self.cache.lock().await.put(query.clone(), candidates.clone());
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl Geocoder for Counting {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, GeocodeError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if query.text == "flaky" && n == 0 {
                return Err(GeocodeError::Http { status: 503 });
            }
            Ok(vec![Candidate {
                display_name: query.text.clone(),
                lat: 0.0,
                lon: 0.0,
                country_code: None,
                address: Default::default(),
            }])
        }
    }

    #[tokio::test]
    async fn test_memoizes_per_query_and_filters() {
        let geocoder = CachingGeocoder::new(Counting::default(), 16);

        geocoder.search(&SearchQuery::country("France")).await.unwrap();
        geocoder.search(&SearchQuery::country("France")).await.unwrap();
        assert_eq!(geocoder.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(geocoder.hits(), 1);

        // Same text, different filters
        geocoder.search(&SearchQuery::new("France")).await.unwrap();
        assert_eq!(geocoder.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_identical_queries_call_once() {
        let geocoder = CachingGeocoder::new(
            Counting {
                delay: Duration::from_millis(20),
                ..Default::default()
            },
            16,
        );
        let query = SearchQuery::city_in("Lyon", "FR", 5);

        let (a, b) = tokio::join!(geocoder.search(&query), geocoder.search(&query));

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(geocoder.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!((geocoder.misses(), geocoder.hits()), (1, 1));
    }

    #[tokio::test]
    async fn test_errors_not_cached() {
        let geocoder = CachingGeocoder::new(Counting::default(), 16);
        assert!(geocoder.search(&SearchQuery::new("flaky")).await.is_err());
        assert!(geocoder.search(&SearchQuery::new("flaky")).await.is_ok());
        assert_eq!(geocoder.misses(), 2);
    }
}
