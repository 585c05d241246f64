//! Denylist filtering of curated variable keys.

use serde::{Deserialize, Serialize};

/// Bands hidden from the variable picker by default: deeper soil layers,
/// raw turbulent heat fluxes and the evaporation sub-components.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "volumetric_soil_water_layer_2",
    "volumetric_soil_water_layer_3",
    "volumetric_soil_water_layer_4",
    "soil_temperature_level_2",
    "soil_temperature_level_3",
    "soil_temperature_level_4",
    "surface_latent_heat_flux",
    "surface_sensible_heat_flux",
    "evaporation_from_bare_soil",
    "evaporation_from_open_water_surfaces",
    "evaporation_from_the_top_of_canopy",
    "evaporation_from_vegetation_transpiration",
];

/// Case-insensitive substring patterns; a key matching any pattern is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Denylist {
    patterns: Vec<String>,
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST.iter().copied())
    }
}

impl From<Vec<String>> for Denylist {
    fn from(patterns: Vec<String>) -> Self {
        Self::new(patterns)
    }
}

impl From<Denylist> for Vec<String> {
    fn from(denylist: Denylist) -> Self {
        denylist.patterns
    }
}

impl Denylist {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// A denylist that keeps everything.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_denied(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.patterns.iter().any(|p| key.contains(p.as_str()))
    }

    /// Keys not denied, in their original order.
    pub fn apply<I, S>(&self, keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter()
            .map(|k| k.as_ref().to_string())
            .filter(|k| !self.is_denied(k))
            .collect()
    }
}
