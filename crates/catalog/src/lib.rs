//! Dataset band catalog.
//!
//! A catalog maps each band of a dataset to its display metadata and
//! visualization spec. It is scraped once from the dataset's public
//! documentation page, classified, and persisted in a JSON cache file keyed
//! by dataset id. Later requests are served from the cache.

pub mod entry;
pub mod error;
pub mod fetcher;
pub mod normalize;
pub mod parser;
pub mod store;

pub use entry::{build_catalog, Catalog, CatalogEntry, RawBand};
pub use error::CatalogError;
pub use fetcher::{get_catalog, PageFetcher};
pub use parser::parse_band_table;
pub use store::{CatalogStore, JsonFileStore, MemoryStore};
