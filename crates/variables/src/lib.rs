//! Variable handling for ERA5 bands.
//!
//! - [`classifier`] maps a raw band name and unit to a display range and palette
//! - [`resolver`] matches curated keys against the bands a dataset snapshot exposes
//! - [`filter`] drops noisy or duplicate variables before they reach the UI
//! - [`curated`] is the default list of variables offered for comparison

pub mod classifier;
pub mod curated;
pub mod filter;
pub mod resolver;
pub mod units;

pub use classifier::{classify, classify_category, Category, Rule, RULES};
pub use curated::{CuratedVariable, DEFAULT_CURATED};
pub use filter::Denylist;
pub use resolver::{candidate_bands, resolve, Resolution};
pub use units::normalize_unit;
