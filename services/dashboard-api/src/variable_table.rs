//! The variable picker: curated keys, filtered and resolved against the live
//! dataset, joined with catalog metadata.

use catalog::{Catalog, CatalogEntry};
use era5_common::VisualizationSpec;
use serde::{Deserialize, Serialize};
use variables::{classify_category, resolve, Category, CuratedVariable, Denylist, Resolution};

/// One selectable variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableOption {
    pub key: String,
    pub label: String,
    /// Band present in the current dataset snapshot
    pub band: String,
    pub display_name: String,
    pub unit: String,
    pub description: String,
    pub category: Category,
    pub visualization_spec: VisualizationSpec,
}

impl VariableOption {
    fn new(curated: &CuratedVariable, band: &str, entry: Option<&CatalogEntry>) -> Self {
        match entry {
            Some(entry) => Self {
                key: curated.key.clone(),
                label: curated.label.clone(),
                band: band.to_string(),
                display_name: entry.display_name.clone(),
                unit: entry.unit.clone(),
                description: entry.description.clone(),
                category: entry.category,
                visualization_spec: entry.visualization_spec.clone(),
            },
            None => {
                let category = classify_category(band, "");
                Self {
                    key: curated.key.clone(),
                    label: curated.label.clone(),
                    band: band.to_string(),
                    display_name: curated.key.clone(),
                    unit: String::new(),
                    description: String::new(),
                    category,
                    visualization_spec: category.spec(),
                }
            }
        }
    }
}

/// Selectable options in curated order plus the keys with no matching band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableTable {
    pub options: Vec<VariableOption>,
    pub missing: Vec<String>,
}

impl VariableTable {
    pub fn build(
        curated: &[CuratedVariable],
        denylist: &Denylist,
        catalog: &Catalog,
        live_bands: &[String],
    ) -> Self {
        let kept: Vec<&CuratedVariable> = curated
            .iter()
            .filter(|c| !denylist.is_denied(&c.key))
            .collect();
        let resolution: Resolution = resolve(kept.iter().map(|c| c.key.as_str()), live_bands);

        let mut options = Vec::with_capacity(resolution.resolved.len());
        for curated in kept {
            let Some(band) = resolution.band_for(&curated.key) else {
                continue;
            };
            if options.iter().any(|o: &VariableOption| o.key == curated.key) {
                continue;
            }
            // Catalog rows are keyed by documented band name, which may be
            // either the resolved band or the curated key.
            let entry = catalog.get(band).or_else(|| catalog.get(&curated.key));
            options.push(VariableOption::new(curated, band, entry));
        }

        Self {
            options,
            missing: resolution.missing,
        }
    }

    pub fn find(&self, key: &str) -> Option<&VariableOption> {
        self.options.iter().find(|o| o.key == key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.options.iter().map(|o| o.key.clone()).collect()
    }
}
