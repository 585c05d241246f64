//! Text clean-up for scraped catalog rows.

pub use variables::normalize_unit;

/// Descriptions that are raw underscore-joined tokens become title case;
/// prose descriptions are kept as written.
pub fn humanize_description(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.contains('_') {
        title_case(&trimmed.replace('_', " "))
    } else {
        trimmed.to_string()
    }
}

/// Display name derived from a band id, e.g. "temperature_2m" -> "Temperature 2m".
pub fn display_name(variable_id: &str) -> String {
    title_case(&variable_id.replace('_', " "))
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("temperature_2m"), "Temperature 2m");
        assert_eq!(
            display_name("surface_net_solar_radiation_sum"),
            "Surface Net Solar Radiation Sum"
        );
    }

    #[test]
    fn test_humanize_description() {
        assert_eq!(
            humanize_description("volumetric_soil_water_layer_1"),
            "Volumetric Soil Water Layer 1"
        );
        assert_eq!(
            humanize_description("Temperature of air at 2m above the surface."),
            "Temperature of air at 2m above the surface."
        );
    }

    #[test]
    fn test_unit_normalization() {
        assert_eq!(normalize_unit("K"), "C");
        assert_eq!(normalize_unit("m"), "m");
    }
}
