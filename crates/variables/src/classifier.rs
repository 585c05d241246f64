//! Rule-based variable classification.
//!
//! Each band is matched against [`RULES`] in order and the first rule whose
//! predicate holds decides the [`Category`]. Order matters: categories
//! overlap (`snow_depth` must be caught by the snow rules before anything
//! looking for "depth"), so the table is the single source of priority.
//!
//! Matching is a case-insensitive substring test on the variable id, plus
//! the unit for the temperature and pressure rules.

use era5_common::style::{RampKind, VisualizationSpec};
use serde::{Deserialize, Serialize};

use crate::units::is_celsius;

/// Semantic category of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Temperature,
    SoilWater,
    SnowCover,
    SnowDensity,
    SnowDepth,
    LakeIceDepth,
    LakeDepth,
    LakeShape,
    Reservoir,
    Albedo,
    Evaporation,
    Precipitation,
    HeatFlux,
    SolarRadiation,
    ThermalRadiation,
    Wind,
    LeafAreaIndex,
    Pressure,
    Generic,
}

const TEMPERATURE: &[&str] = &["#0000ff", "#00ffff", "#ffff00", "#ff0000"];
const SOIL_MOISTURE: &[&str] = &["#fff7bc", "#a6bddb", "#3690c0", "#034e7b"];
const SNOW: &[&str] = &["#ffffff", "#ebf5fb", "#aed6f1", "#2e86c1"];
const ICE: &[&str] = &["#f0f9ff", "#bde0f5", "#5aa7d9", "#0b4f8a"];
const GENERIC: &[&str] = &["#f0f0f0", "#252525"];
const PRECIPITATION: &[&str] = &["#ffffff", "#00fbff", "#0033ff"];
const EVAPORATION: &[&str] = &["#8c510a", "#d8b365", "#f5f5f5", "#5ab4ac", "#01665e"];
const FLUX: &[&str] = &["#2166ac", "#67a9cf", "#f7f7f7", "#ef8a62", "#b2182b"];
const SOLAR: &[&str] = &["#000000", "#990000", "#ffcc00", "#ffffff"];
const WIND: &[&str] = &["#762a83", "#af8dc3", "#f7f7f7", "#7fbf7b", "#1b7837"];
const VEGETATION: &[&str] = &["#ffffe5", "#addd8e", "#31a354", "#004529"];
const PRESSURE: &[&str] = &["#fee5d9", "#fcae91", "#fb6a4a", "#cb181d"];

impl Category {
    /// Display range and palette for this category.
    pub fn spec(&self) -> VisualizationSpec {
        let (min, max, palette) = match self {
            Category::Temperature => (220.0, 320.0, TEMPERATURE),
            Category::SoilWater => (0.0, 0.5, SOIL_MOISTURE),
            Category::SnowCover => (0.0, 1.0, SNOW),
            Category::SnowDensity => (100.0, 500.0, SNOW),
            Category::SnowDepth => (0.0, 0.5, SNOW),
            Category::LakeIceDepth => (0.0, 2.0, ICE),
            Category::LakeDepth => (0.0, 50.0, GENERIC),
            Category::LakeShape => (0.0, 1.0, GENERIC),
            Category::Reservoir => (0.0, 0.001, PRECIPITATION),
            Category::Albedo => (0.0, 1.0, GENERIC),
            Category::Evaporation => (-0.01, 0.0, EVAPORATION),
            Category::Precipitation => (0.0, 0.02, PRECIPITATION),
            Category::HeatFlux => (-1e7, 1e7, FLUX),
            Category::SolarRadiation => (0.0, 2.5e7, SOLAR),
            Category::ThermalRadiation => (-1.5e7, 0.0, FLUX),
            Category::Wind => (-15.0, 15.0, WIND),
            Category::LeafAreaIndex => (0.0, 8.0, VEGETATION),
            Category::Pressure => (95000.0, 105000.0, PRESSURE),
            Category::Generic => return VisualizationSpec::generic(),
        };
        VisualizationSpec::new(min, max, palette, self.ramp())
    }

    /// Signed quantities read from a neutral midpoint.
    pub fn ramp(&self) -> RampKind {
        match self {
            Category::Evaporation
            | Category::HeatFlux
            | Category::ThermalRadiation
            | Category::Wind => RampKind::Diverging,
            _ => RampKind::Sequential,
        }
    }
}

/// A classification rule: the category assigned when `predicate` holds.
pub struct Rule {
    pub category: Category,
    predicate: fn(&str, &str) -> bool,
}

impl Rule {
    /// `name` and `unit` are expected lowercased.
    pub fn matches(&self, name: &str, unit: &str) -> bool {
        (self.predicate)(name, unit)
    }
}

fn has_all(name: &str, parts: &[&str]) -> bool {
    parts.iter().all(|p| name.contains(p))
}

fn has_any(name: &str, parts: &[&str]) -> bool {
    parts.iter().any(|p| name.contains(p))
}

fn temperature(n: &str, u: &str) -> bool {
    is_celsius(u) || n.contains("temperature")
}

fn soil_water(n: &str, _: &str) -> bool {
    n.contains("volumetric_soil_water")
}

fn snow_cover(n: &str, _: &str) -> bool {
    n.contains("snow") && has_any(n, &["cover", "albedo"])
}

fn snow_density(n: &str, _: &str) -> bool {
    has_all(n, &["snow", "density"])
}

fn snow_depth(n: &str, _: &str) -> bool {
    n.contains("snow") && has_any(n, &["depth", "fall", "melt"])
}

fn lake_ice_depth(n: &str, _: &str) -> bool {
    has_all(n, &["lake", "depth", "ice"])
}

fn lake_depth(n: &str, _: &str) -> bool {
    has_all(n, &["lake", "depth"])
}

fn lake_shape(n: &str, _: &str) -> bool {
    n.contains("lake_shape")
}

fn reservoir(n: &str, _: &str) -> bool {
    n.contains("reservoir")
}

fn albedo(n: &str, _: &str) -> bool {
    n.contains("albedo")
}

fn evaporation(n: &str, _: &str) -> bool {
    n.contains("evaporation")
}

fn precipitation(n: &str, _: &str) -> bool {
    has_any(n, &["precipitation", "runoff"])
}

fn heat_flux(n: &str, _: &str) -> bool {
    n.contains("heat_flux")
}

fn solar_radiation(n: &str, _: &str) -> bool {
    has_all(n, &["radiation", "solar"])
}

fn thermal_radiation(n: &str, _: &str) -> bool {
    n.contains("radiation")
}

fn wind(n: &str, _: &str) -> bool {
    n.contains("wind")
}

fn leaf_area_index(n: &str, _: &str) -> bool {
    n.contains("leaf_area_index")
}

fn pressure(n: &str, u: &str) -> bool {
    n.contains("pressure") || u.contains("pa")
}

const fn rule(category: Category, predicate: fn(&str, &str) -> bool) -> Rule {
    Rule {
        category,
        predicate,
    }
}

/// Classification rules in priority order.
pub static RULES: &[Rule] = &[
    rule(Category::Temperature, temperature),
    rule(Category::SoilWater, soil_water),
    rule(Category::SnowCover, snow_cover),
    rule(Category::SnowDensity, snow_density),
    rule(Category::SnowDepth, snow_depth),
    rule(Category::LakeIceDepth, lake_ice_depth),
    rule(Category::LakeDepth, lake_depth),
    rule(Category::LakeShape, lake_shape),
    rule(Category::Reservoir, reservoir),
    rule(Category::Albedo, albedo),
    rule(Category::Evaporation, evaporation),
    rule(Category::Precipitation, precipitation),
    rule(Category::HeatFlux, heat_flux),
    rule(Category::SolarRadiation, solar_radiation),
    rule(Category::ThermalRadiation, thermal_radiation),
    rule(Category::Wind, wind),
    rule(Category::LeafAreaIndex, leaf_area_index),
    rule(Category::Pressure, pressure),
];

/// Category of a variable; [`Category::Generic`] when no rule matches.
pub fn classify_category(variable_id: &str, unit: &str) -> Category {
    let name = variable_id.to_lowercase();
    let unit = unit.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.matches(&name, &unit))
        .map(|rule| rule.category)
        .unwrap_or(Category::Generic)
}

/// Visualization spec for a variable. Total: unknown variables get the generic spec.
pub fn classify(variable_id: &str, unit: &str) -> VisualizationSpec {
    let category = classify_category(variable_id, unit);
    tracing::trace!(variable_id, unit, ?category, "Classified variable");
    category.spec()
}
