//! Common types and utilities shared across the ERA5 dashboard crates.

pub mod bbox;
pub mod error;
pub mod legend;
pub mod location;
pub mod style;
pub mod time;

pub use bbox::{BoundingBox, GeoPoint, Viewport};
pub use error::{DashboardError, DashboardResult};
pub use legend::{Legend, LegendSide};
pub use location::{continent_for_country, Continent, ContinentCode};
pub use style::{Color, RampKind, VisualizationSpec};
pub use time::YearMonth;
