//! Client for the remote geospatial compute service.
//!
//! The service is a black box that can list a dataset's bands, report its
//! time extent, render a single band for one month as a tile layer, and
//! reduce a band over a region to a scalar. [`ComputeService`] is the seam
//! the dashboard codes against; [`HttpComputeService`] talks to the JSON
//! gateway in front of the compute backend.

pub mod credentials;
pub mod error;
pub mod http;
pub mod service;
pub mod types;

pub use credentials::ServiceAccount;
pub use error::ComputeError;
pub use http::{HttpComputeService, HttpComputeConfig};
pub use service::ComputeService;
pub use types::{LayerRequest, Reducer, ReductionRequest, Region, TileLayer, TimeExtent};
