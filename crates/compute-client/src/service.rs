//! The compute service seam.

use async_trait::async_trait;

use crate::error::ComputeError;
use crate::types::{LayerRequest, ReductionRequest, TileLayer, TimeExtent};

/// Operations the dashboard needs from the geospatial backend.
#[async_trait]
pub trait ComputeService: Send + Sync {
    /// Band names of the dataset's current snapshot.
    async fn band_names(&self, dataset_id: &str) -> Result<Vec<String>, ComputeError>;

    /// Timestamps of the first and last image in the dataset.
    async fn time_extent(&self, dataset_id: &str) -> Result<TimeExtent, ComputeError>;

    /// Tile layer for one band of the image covering `request.month`.
    async fn month_layer(&self, request: &LayerRequest) -> Result<TileLayer, ComputeError>;

    /// Region statistic; `None` when the region has no valid pixels.
    async fn reduce_region(&self, request: &ReductionRequest) -> Result<Option<f64>, ComputeError>;
}
