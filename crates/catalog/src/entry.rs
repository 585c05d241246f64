//! Catalog entries.

use std::collections::BTreeMap;

use era5_common::VisualizationSpec;
use serde::{Deserialize, Serialize};
use variables::{classify_category, Category};

use crate::normalize::{display_name, humanize_description, normalize_unit};

/// A row scraped from a documentation page, before clean-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBand {
    pub variable_id: String,
    pub unit: String,
    pub description: String,
}

/// Display metadata for one band of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub variable_id: String,
    pub display_name: String,
    pub unit: String,
    pub description: String,
    pub category: Category,
    pub visualization_spec: VisualizationSpec,
}

impl CatalogEntry {
    /// Normalize and classify a scraped row.
    pub fn from_raw(raw: &RawBand) -> Self {
        let unit = normalize_unit(&raw.unit);
        let category = classify_category(&raw.variable_id, &unit);
        Self {
            variable_id: raw.variable_id.clone(),
            display_name: display_name(&raw.variable_id),
            description: humanize_description(&raw.description),
            visualization_spec: category.spec(),
            category,
            unit,
        }
    }
}

/// Per-dataset catalog keyed by variable id.
pub type Catalog = BTreeMap<String, CatalogEntry>;

/// Build a catalog from scraped rows. The first row for a variable id wins.
pub fn build_catalog(rows: &[RawBand]) -> Catalog {
    let mut catalog = Catalog::new();
    for raw in rows {
        catalog
            .entry(raw.variable_id.clone())
            .or_insert_with(|| CatalogEntry::from_raw(raw));
    }
    catalog
}
