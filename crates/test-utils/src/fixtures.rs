//! Fixture data shared by catalog, navigator and service tests.

use std::collections::BTreeMap;

use geocoding::Candidate;

pub const ERA5_DATASET: &str = "ECMWF/ERA5_LAND/MONTHLY_AGGR";

/// A trimmed copy of a dataset documentation page: one unrelated table, then
/// the band table with a section row and a row missing cells.
pub const ERA5_DOCS_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>ERA5-Land Monthly Aggregated</title></head>
<body>
  <h2>Dataset Availability</h2>
  <table>
    <tr><th>Provider</th><th>Cadence</th></tr>
    <tr><td>Daily Aggregates: Google and Copernicus Climate Data Store</td><td>1 Month</td></tr>
  </table>
  <h2>Bands</h2>
  <table class="eecat">
    <tr><th>Name</th><th>Units</th><th>Min</th><th>Max</th><th>Description</th></tr>
    <tr><td colspan="5">Monthly averages</td></tr>
    <tr><td><code>temperature_2m</code></td><td>K</td><td>223.6*</td><td>304.5*</td>
        <td>Temperature of air at 2m above the surface of land, sea or in-land waters.</td></tr>
    <tr><td><code>dewpoint_temperature_2m</code></td><td>K</td><td></td><td></td>
        <td>Temperature to which the air, at 2 metres above the surface of the Earth, would have to be cooled for saturation to occur.</td></tr>
    <tr><td><code>skin_temperature</code></td><td>K</td><td></td><td></td>
        <td>Temperature of the surface of the Earth.</td></tr>
    <tr><td><code>volumetric_soil_water_layer_1</code></td><td>Volume fraction</td><td></td><td></td>
        <td>Volume of water in soil layer 1 (0 - 7 cm) of the ECMWF Integrated Forecasting System.</td></tr>
    <tr><td><code>volumetric_soil_water_layer_2</code></td><td>Volume fraction</td><td></td><td></td>
        <td>Volume of water in soil layer 2 (7 - 28 cm).</td></tr>
    <tr><td><code>snow_cover</code></td><td>%</td><td></td><td></td>
        <td>Fraction of the grid box covered by snow.</td></tr>
    <tr><td><code>total_precipitation_sum</code></td><td>m</td><td></td><td></td>
        <td>Accumulated liquid and frozen water, including rain and snow, that falls to the Earth's surface.</td></tr>
    <tr><td><code>total_evaporation_sum</code></td><td>m of water equivalent</td><td></td><td></td>
        <td>Accumulated amount of water that has evaporated from the Earth's surface.</td></tr>
    <tr><td><code>surface_net_solar_radiation_sum</code></td><td>J/m^2</td><td></td><td></td>
        <td>Amount of solar radiation reaching the surface of the Earth minus the amount reflected.</td></tr>
    <tr><td><code>u_component_of_wind_10m</code></td><td>m/s</td><td></td><td></td>
        <td>Eastward component of the 10m wind.</td></tr>
    <tr><td><code>v_component_of_wind_10m</code></td><td>m/s</td><td></td><td></td>
        <td>Northward component of the 10m wind.</td></tr>
    <tr><td><code>surface_pressure</code></td><td>Pa</td><td></td><td></td>
        <td>Pressure of the atmosphere on the surface of land, sea and in-land water.</td></tr>
    <tr><td><code>leaf_area_index_high_vegetation</code></td><td>Area fraction</td><td></td><td></td>
        <td>One-half of the total green leaf area per unit horizontal ground surface area for high vegetation type.</td></tr>
    <tr><td>broken_row</td><td>m</td></tr>
  </table>
</body>
</html>"#;

/// Band names of the fixture page, in page order.
pub const ERA5_DOCS_BANDS: &[&str] = &[
    "temperature_2m",
    "dewpoint_temperature_2m",
    "skin_temperature",
    "volumetric_soil_water_layer_1",
    "volumetric_soil_water_layer_2",
    "snow_cover",
    "total_precipitation_sum",
    "total_evaporation_sum",
    "surface_net_solar_radiation_sum",
    "u_component_of_wind_10m",
    "v_component_of_wind_10m",
    "surface_pressure",
    "leaf_area_index_high_vegetation",
];

/// A live band list where some curated keys only exist with an aggregate
/// suffix and `skin_temperature` is absent.
pub const ERA5_LIVE_BANDS: &[&str] = &[
    "temperature_2m",
    "dewpoint_temperature_2m",
    "volumetric_soil_water_layer_1",
    "volumetric_soil_water_layer_2",
    "snow_cover",
    "total_precipitation_sum",
    "total_evaporation_sum",
    "surface_net_solar_radiation_sum",
    "u_component_of_wind_10m",
    "v_component_of_wind_10m",
    "surface_pressure",
    "surface_latent_heat_flux_sum",
];

pub fn live_bands() -> Vec<String> {
    ERA5_LIVE_BANDS.iter().map(|b| b.to_string()).collect()
}

/// Geocoding candidate with the given ISO alpha-2 country code.
pub fn candidate(name: &str, lat: f64, lon: f64, country_code: &str) -> Candidate {
    let mut address = BTreeMap::new();
    address.insert("country_code".to_string(), country_code.to_lowercase());
    Candidate {
        display_name: name.to_string(),
        lat,
        lon,
        country_code: Some(country_code.to_uppercase()),
        address,
    }
}

pub fn france() -> Candidate {
    candidate("France", 46.6034, 1.8883, "FR")
}

pub fn egypt() -> Candidate {
    candidate("Egypt", 26.2540, 29.2675, "EG")
}

pub fn united_states() -> Candidate {
    candidate("United States", 39.7837, -100.4459, "US")
}

pub fn lyon() -> Candidate {
    candidate("Lyon, Métropole de Lyon, Rhône, France", 45.7578, 4.8320, "FR")
}

/// Two US cities sharing a name, for disambiguation tests.
pub fn springfields() -> Vec<Candidate> {
    vec![
        candidate("Springfield, Sangamon County, Illinois, United States", 39.7990, -89.6440, "US"),
        candidate("Springfield, Greene County, Missouri, United States", 37.2090, -93.2923, "US"),
    ]
}
