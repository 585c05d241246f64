//! The default set of variables offered in the comparison view.

use serde::{Deserialize, Serialize};

/// A variable the dashboard wants to show, by curated key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedVariable {
    pub key: String,
    pub label: String,
}

impl CuratedVariable {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// (key, label) pairs for the stock comparison variables.
pub const DEFAULT_CURATED: &[(&str, &str)] = &[
    ("temperature_2m", "Temperature (2m)"),
    ("total_precipitation_sum", "Total Precipitation"),
    ("volumetric_soil_water_layer_1", "Soil Moisture (0-7cm)"),
    ("surface_pressure", "Surface Pressure"),
    ("snow_depth", "Snow Depth"),
    ("total_evaporation_sum", "Evaporation"),
    ("runoff_sum", "Runoff"),
    ("surface_net_solar_radiation_sum", "Solar Radiation"),
];

pub fn default_curated() -> Vec<CuratedVariable> {
    DEFAULT_CURATED
        .iter()
        .map(|(key, label)| CuratedVariable::new(*key, *label))
        .collect()
}
