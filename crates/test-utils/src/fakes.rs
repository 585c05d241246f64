//! In-process stand-ins for the compute service and the geocoder.
//!
//! Both count their calls so tests can assert memoization, and both can be
//! told to fail for specific inputs.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use compute_client::{
    ComputeError, ComputeService, LayerRequest, ReductionRequest, TileLayer, TimeExtent,
};
use era5_common::YearMonth;
use geocoding::{Candidate, GeocodeError, Geocoder, SearchQuery};

/// Scripted compute backend.
///
/// Tile URLs encode dataset, band and month so tests can tell layers apart.
/// Reductions return the configured base value plus the calendar month, if
/// any, so climatology series are distinguishable per month.
pub struct FakeCompute {
    bands: Vec<String>,
    extent: TimeExtent,
    failing_bands: HashSet<String>,
    reductions: HashMap<String, f64>,
    failing_reductions: HashSet<String>,
    failing_calendar_months: HashSet<u32>,
    pub band_calls: AtomicUsize,
    pub extent_calls: AtomicUsize,
    pub layer_calls: AtomicUsize,
    pub reduce_calls: AtomicUsize,
}

impl FakeCompute {
    pub fn new() -> Self {
        Self {
            bands: crate::fixtures::live_bands(),
            extent: TimeExtent {
                start: Utc.with_ymd_and_hms(1950, 1, 1, 0, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            },
            failing_bands: HashSet::new(),
            reductions: HashMap::new(),
            failing_reductions: HashSet::new(),
            failing_calendar_months: HashSet::new(),
            band_calls: AtomicUsize::new(0),
            extent_calls: AtomicUsize::new(0),
            layer_calls: AtomicUsize::new(0),
            reduce_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_bands(mut self, bands: &[&str]) -> Self {
        self.bands = bands.iter().map(|b| b.to_string()).collect();
        self
    }

    /// Extent covering `first` through `last`, both inclusive.
    pub fn with_months(mut self, first: YearMonth, last: YearMonth) -> Self {
        self.extent = TimeExtent {
            start: Utc.from_utc_datetime(&first.first_day().and_hms_opt(0, 0, 0).unwrap()),
            end: Utc.from_utc_datetime(&last.first_day().and_hms_opt(0, 0, 0).unwrap()),
        };
        self
    }

    /// Map requests for `band` fail with an HTTP 500.
    pub fn fail_band(mut self, band: &str) -> Self {
        self.failing_bands.insert(band.to_string());
        self
    }

    pub fn with_reduction(mut self, band: &str, value: f64) -> Self {
        self.reductions.insert(band.to_string(), value);
        self
    }

    pub fn fail_reduction(mut self, band: &str) -> Self {
        self.failing_reductions.insert(band.to_string());
        self
    }

    /// Reductions restricted to this calendar month fail.
    pub fn fail_calendar_month(mut self, month: u32) -> Self {
        self.failing_calendar_months.insert(month);
        self
    }

    pub fn layer_calls(&self) -> usize {
        self.layer_calls.load(Ordering::SeqCst)
    }

    pub fn band_calls(&self) -> usize {
        self.band_calls.load(Ordering::SeqCst)
    }

    pub fn reduce_calls(&self) -> usize {
        self.reduce_calls.load(Ordering::SeqCst)
    }
}

impl Default for FakeCompute {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComputeService for FakeCompute {
    async fn band_names(&self, _dataset_id: &str) -> Result<Vec<String>, ComputeError> {
        self.band_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.bands.clone())
    }

    async fn time_extent(&self, _dataset_id: &str) -> Result<TimeExtent, ComputeError> {
        self.extent_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.extent)
    }

    async fn month_layer(&self, request: &LayerRequest) -> Result<TileLayer, ComputeError> {
        self.layer_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_bands.contains(&request.band) {
            return Err(ComputeError::Http {
                status: 500,
                message: format!("computation failed for {}", request.band),
            });
        }
        if !self.extent.months().contains(&request.month) {
            return Err(ComputeError::NoData {
                band: request.band.clone(),
                month: request.month.to_string(),
            });
        }

        Ok(TileLayer {
            url_template: format!(
                "https://tiles.test/{}/{}/{}/{{z}}/{{x}}/{{y}}",
                request.dataset_id.replace('/', "_"),
                request.band,
                request.month
            ),
            attribution: "test".to_string(),
        })
    }

    async fn reduce_region(&self, request: &ReductionRequest) -> Result<Option<f64>, ComputeError> {
        self.reduce_calls.fetch_add(1, Ordering::SeqCst);

        let month_fails = request
            .calendar_month
            .map(|m| self.failing_calendar_months.contains(&m))
            .unwrap_or(false);
        if self.failing_reductions.contains(&request.band) || month_fails {
            return Err(ComputeError::Http {
                status: 429,
                message: "quota exceeded".to_string(),
            });
        }

        Ok(self
            .reductions
            .get(&request.band)
            .map(|base| base + request.calendar_month.unwrap_or(0) as f64))
    }
}

enum Scripted {
    Matches(Vec<Candidate>),
    Fail(u16),
}

/// Geocoder answering from a script keyed by lowercased query text.
/// Unscripted queries return no matches.
#[derive(Default)]
pub struct FakeGeocoder {
    script: HashMap<String, Scripted>,
    queries: Mutex<Vec<SearchQuery>>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, text: &str, candidates: Vec<Candidate>) -> Self {
        self.script
            .insert(text.to_lowercase(), Scripted::Matches(candidates));
        self
    }

    pub fn fail(mut self, text: &str, status: u16) -> Self {
        self.script.insert(text.to_lowercase(), Scripted::Fail(status));
        self
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, GeocodeError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }

        match self.script.get(&query.text.to_lowercase()) {
            Some(Scripted::Matches(candidates)) => {
                Ok(candidates.iter().take(query.limit as usize).cloned().collect())
            }
            Some(Scripted::Fail(status)) => Err(GeocodeError::Http { status: *status }),
            None => Ok(Vec::new()),
        }
    }
}
