//! Visualization parameters for rendering a single-band map layer.
//!
//! A [`VisualizationSpec`] is the numeric display range plus an ordered color
//! ramp. The compute service uses it to color tiles; the legend renderer uses
//! it to draw the matching color bar.

use serde::{Deserialize, Serialize};

/// Whether a ramp is read from one end (sequential) or from a neutral midpoint
/// (diverging, for signed quantities).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampKind {
    #[default]
    Sequential,
    Diverging,
}

/// Display range and color ramp for a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationSpec {
    /// Value mapped to the first palette color
    pub min: f64,

    /// Value mapped to the last palette color
    pub max: f64,

    /// Ordered color ramp, low to high
    pub palette: Vec<Color>,

    /// Ramp kind
    #[serde(default)]
    pub ramp: RampKind,
}

impl VisualizationSpec {
    pub fn new(min: f64, max: f64, palette: &[&str], ramp: RampKind) -> Self {
        Self {
            min,
            max,
            palette: palette.iter().map(|c| Color::Hex((*c).to_string())).collect(),
            ramp,
        }
    }

    /// Fallback spec for variables no rule recognizes.
    pub fn generic() -> Self {
        Self::new(0.0, 100.0, &["#f7fbff", "#08306b"], RampKind::Sequential)
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        if self.palette.len() < 2 {
            return Err(StyleError::ValidationError(
                "Palette must have at least 2 colors".to_string(),
            ));
        }

        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(StyleError::ValidationError(format!(
                "Range must be finite and ascending, got [{}, {}]",
                self.min, self.max
            )));
        }

        for color in &self.palette {
            if color.try_rgba().is_none() {
                return Err(StyleError::ValidationError(format!(
                    "Invalid color: {:?}",
                    color
                )));
            }
        }

        Ok(())
    }

    /// True when zero lies inside the display range.
    pub fn includes_zero(&self) -> bool {
        self.min <= 0.0 && self.max >= 0.0
    }

    /// Palette as `#rrggbb` strings.
    pub fn palette_hex(&self) -> Vec<String> {
        self.palette.iter().map(Color::to_hex).collect()
    }

    /// Interpolate the color for a value; palette colors are evenly spaced
    /// across `[min, max]` and values outside the range clamp.
    pub fn color_at(&self, value: f64) -> Color {
        let (first, last) = match (self.palette.first(), self.palette.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Color::transparent(),
        };

        if value <= self.min || self.palette.len() == 1 {
            return first.clone();
        }
        if value >= self.max {
            return last.clone();
        }

        let segments = (self.palette.len() - 1) as f64;
        let position = (value - self.min) / (self.max - self.min) * segments;
        let index = (position.floor() as usize).min(self.palette.len() - 2);
        let t = position - index as f64;

        self.palette[index].lerp(&self.palette[index + 1], t)
    }

    /// CSS `linear-gradient` over the palette in the given direction.
    pub fn css_gradient(&self, direction: &str) -> String {
        format!(
            "linear-gradient({}, {})",
            direction,
            self.palette_hex().join(", ")
        )
    }
}

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Hex string: "#RRGGBB" or "#RRGGBBAA"
    Hex(String),

    /// Explicit RGBA
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl Color {
    pub fn transparent() -> Self {
        Color::Rgba {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// RGBA tuple, or `None` for malformed hex strings.
    pub fn try_rgba(&self) -> Option<(u8, u8, u8, u8)> {
        match self {
            Color::Hex(s) => parse_hex_color(s),
            Color::Rgba { r, g, b, a } => Some((*r, *g, *b, *a)),
        }
    }

    /// Convert to RGBA tuple; malformed colors render as opaque black.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        self.try_rgba().unwrap_or((0, 0, 0, 255))
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let (r, g, b, a) = self.to_rgba();
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Linear interpolation between two colors.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let (r1, g1, b1, a1) = self.to_rgba();
        let (r2, g2, b2, a2) = other.to_rgba();

        let t = t.clamp(0.0, 1.0);

        let lerp_u8 = |a: u8, b: u8, t: f64| -> u8 {
            ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8
        };

        Color::Rgba {
            r: lerp_u8(r1, r2, t),
            g: lerp_u8(g1, g2, t),
            b: lerp_u8(b1, b2, t),
            a: lerp_u8(a1, a2, t),
        }
    }
}

fn parse_hex_color(s: &str) -> Option<(u8, u8, u8, u8)> {
    let s = s.strip_prefix('#')?;
    if !s.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&s[range], 16).ok();

    match s.len() {
        6 => Some((channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
        8 => Some((channel(0..2)?, channel(2..4)?, channel(4..6)?, channel(6..8)?)),
        _ => None,
    }
}

/// Style-related errors.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("Validation error: {0}")]
    ValidationError(String),
}
