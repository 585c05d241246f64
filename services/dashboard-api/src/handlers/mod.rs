//! HTTP request handlers for the dashboard API.
//!
//! - `health`: liveness and Prometheus metrics
//! - `catalog`: per-dataset band metadata
//! - `variables`: selectable variables and available months
//! - `comparison`: dual-map state transitions and rendering
//! - `navigator`: location drill-down transitions
//! - `view`: KPI tiles and seasonal chart for a location

pub mod catalog;
pub mod comparison;
pub mod health;
pub mod navigator;
pub mod variables;
pub mod view;
