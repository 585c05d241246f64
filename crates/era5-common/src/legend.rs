//! Vertical color-ramp legends for map panes.

use serde::{Deserialize, Serialize};

use crate::style::VisualizationSpec;

/// Screen edge a legend is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendSide {
    Left,
    Right,
}

impl LegendSide {
    fn css_property(&self) -> &'static str {
        match self {
            LegendSide::Left => "left",
            LegendSide::Right => "right",
        }
    }
}

/// A vertically centered legend: max label on top, min label at the bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    pub side: LegendSide,
    pub min_label: String,
    pub max_label: String,
    /// CSS gradient drawn bottom (min) to top (max)
    pub gradient: String,
    /// Evenly spaced sample colors from min to max
    pub ticks: Vec<String>,
}

impl Legend {
    pub fn from_spec(title: impl Into<String>, spec: &VisualizationSpec, side: LegendSide) -> Self {
        Self::with_ticks(title, spec, side, 5)
    }

    pub fn with_ticks(
        title: impl Into<String>,
        spec: &VisualizationSpec,
        side: LegendSide,
        tick_count: usize,
    ) -> Self {
        let tick_count = tick_count.max(2);
        let ticks = (0..tick_count)
            .map(|i| {
                let t = i as f64 / (tick_count - 1) as f64;
                spec.color_at(spec.min + t * (spec.max - spec.min)).to_hex()
            })
            .collect();

        Self {
            title: title.into(),
            side,
            min_label: format_value(spec.min),
            max_label: format_value(spec.max),
            gradient: spec.css_gradient("to top"),
            ticks,
        }
    }

    /// Absolute-positioned HTML fragment for overlaying on a map pane.
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                r#"<div class="era5-legend" style="position: absolute; z-index: 9999; {side}: 10px; top: 50%; "#,
                r#"transform: translateY(-50%); background: rgba(255, 255, 255, 0.85); padding: 8px; "#,
                r#"border-radius: 6px; border: 1px solid #999; font-family: sans-serif; display: flex; "#,
                r#"flex-direction: column; align-items: center; width: 50px; pointer-events: none;">"#,
                r#"<div style="writing-mode: vertical-rl; transform: rotate(180deg); font-weight: bold; "#,
                r#"font-size: 11px; margin-bottom: 5px; white-space: nowrap;">{title}</div>"#,
                r#"<div style="font-size: 10px; margin-bottom: 2px;">{max}</div>"#,
                r#"<div style="width: 12px; height: 35vh; background: {gradient}; border: 1px solid #777;"></div>"#,
                r#"<div style="font-size: 10px; margin-top: 2px;">{min}</div>"#,
                r#"</div>"#
            ),
            side = self.side.css_property(),
            title = escape_html(&self.title),
            max = escape_html(&self.max_label),
            min = escape_html(&self.min_label),
            gradient = escape_html(&self.gradient),
        )
    }
}

/// Compact label: scientific notation for very large or very small magnitudes.
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-2..1e5).contains(&magnitude) {
        return format!("{:.1e}", value);
    }
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
