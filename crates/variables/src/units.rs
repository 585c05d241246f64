//! Unit string normalization.

/// Display unit for a raw catalog unit. Kelvin is shown as Celsius.
pub fn normalize_unit(unit: &str) -> String {
    let trimmed = unit.trim();
    match trimmed {
        "K" | "k" | "Kelvin" | "kelvin" => "C".to_string(),
        "°C" | "degC" | "deg C" => "C".to_string(),
        _ => trimmed.to_string(),
    }
}

/// True for units that normalize to Celsius.
pub fn is_celsius(unit: &str) -> bool {
    normalize_unit(unit).eq_ignore_ascii_case("c")
}
