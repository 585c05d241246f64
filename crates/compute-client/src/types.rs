//! Request and response types for the compute service.

use chrono::{DateTime, NaiveDate, Utc};
use era5_common::{BoundingBox, GeoPoint, VisualizationSpec, YearMonth};
use serde::{Deserialize, Serialize};

/// First and last image timestamps of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeExtent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeExtent {
    /// Every calendar month covered, oldest first.
    pub fn months(&self) -> Vec<YearMonth> {
        if self.end < self.start {
            return Vec::new();
        }
        YearMonth::from_extent(&self.start, &self.end)
    }
}

/// Render one band of one monthly image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRequest {
    pub dataset_id: String,
    pub band: String,
    pub month: YearMonth,
    pub vis: VisualizationSpec,
}

/// A renderable XYZ tile layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    /// e.g. `https://.../maps/{id}/tiles/{z}/{x}/{y}`
    pub url_template: String,
    pub attribution: String,
}

/// Area a statistic is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Region {
    Rectangle { bbox: BoundingBox },
    Buffer { center: GeoPoint, radius_m: f64 },
}

impl Region {
    pub fn world() -> Self {
        Region::Rectangle {
            bbox: BoundingBox::world(),
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            Region::Rectangle { bbox } => format!("rect:{}", bbox.cache_key()),
            Region::Buffer { center, radius_m } => {
                format!("buf:{:.6}_{:.6}_{:.0}", center.lat, center.lon, radius_m)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    Mean,
    Sum,
}

/// Reduce a band over a region and date range to one number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionRequest {
    pub dataset_id: String,
    pub band: String,
    pub region: Region,
    pub reducer: Reducer,
    /// Nominal pixel size in meters
    pub scale_m: f64,
    /// Inclusive start date
    pub start: NaiveDate,
    /// Exclusive end date
    pub end: NaiveDate,
    /// Restrict to one calendar month (1-12) across the date range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_month: Option<u32>,
}
