//! Side-by-side comparison of two monthly variable maps.
//!
//! [`ComparisonState`] is plain data owned by the client and sent back with
//! every request. [`ComparisonState::apply`] is the only way it changes, and
//! only in response to an explicit user action. Rendering reads the state;
//! it never modifies it.

use compute_client::{ComputeService, LayerRequest};
use era5_common::time::{months_in_year, years_descending};
use era5_common::{BoundingBox, DashboardError, Legend, LegendSide, Viewport, YearMonth};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::layer_cache::{LayerCache, LayerKey};
use crate::variable_table::{VariableOption, VariableTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneSide {
    Left,
    Right,
}

impl PaneSide {
    fn legend_side(self) -> LegendSide {
        match self {
            PaneSide::Left => LegendSide::Left,
            PaneSide::Right => LegendSide::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPaneState {
    pub variable_key: String,
    pub year: i32,
    pub month: u32,
    pub viewport: Viewport,
}

impl MapPaneState {
    pub fn year_month(&self) -> Result<YearMonth, DashboardError> {
        YearMonth::new(self.year, self.month)
            .map_err(|e| DashboardError::InvalidMonth(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonState {
    pub left: MapPaneState,
    pub right: MapPaneState,
    pub sync_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonAction {
    SelectVariable { side: PaneSide, key: String },
    SelectYear { side: PaneSide, year: i32 },
    SelectMonth { side: PaneSide, month: u32 },
    SetSync { enabled: bool },
    Pan { side: PaneSide, viewport: Viewport },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Variable '{0}' is not available")]
    UnknownVariable(String),

    #[error("No data available for {0}")]
    YearUnavailable(i32),

    #[error("Month {month} is not available in {year}")]
    MonthUnavailable { year: i32, month: u32 },

    #[error("The dataset has no selectable variables or months")]
    NothingSelectable,
}

/// What the user may choose from.
#[derive(Debug, Clone, Default)]
pub struct Choices {
    pub keys: Vec<String>,
    pub months: Vec<YearMonth>,
}

impl Choices {
    pub fn new(table: &VariableTable, months: Vec<YearMonth>) -> Self {
        Self {
            keys: table.keys(),
            months,
        }
    }
}

impl ComparisonState {
    /// Both panes on the first variable, the latest year and that year's
    /// first month, with sync on.
    pub fn initial(choices: &Choices, viewport: Viewport) -> Result<Self, SelectionError> {
        let key = choices.keys.first().ok_or(SelectionError::NothingSelectable)?;
        let year = *years_descending(&choices.months)
            .first()
            .ok_or(SelectionError::NothingSelectable)?;
        let month = *months_in_year(&choices.months, year)
            .first()
            .ok_or(SelectionError::NothingSelectable)?;

        let pane = MapPaneState {
            variable_key: key.clone(),
            year,
            month,
            viewport,
        };
        Ok(Self {
            left: pane.clone(),
            right: pane,
            sync_enabled: true,
        })
    }

    pub fn pane(&self, side: PaneSide) -> &MapPaneState {
        match side {
            PaneSide::Left => &self.left,
            PaneSide::Right => &self.right,
        }
    }

    fn pane_mut(&mut self, side: PaneSide) -> &mut MapPaneState {
        match side {
            PaneSide::Left => &mut self.left,
            PaneSide::Right => &mut self.right,
        }
    }

    /// The state after `action`. Rejected actions leave `self` untouched.
    pub fn apply(&self, action: ComparisonAction, choices: &Choices) -> Result<Self, SelectionError> {
        let mut next = self.clone();

        match action {
            ComparisonAction::SelectVariable { side, key } => {
                if !choices.keys.contains(&key) {
                    return Err(SelectionError::UnknownVariable(key));
                }
                next.pane_mut(side).variable_key = key;
            }
            ComparisonAction::SelectYear { side, year } => {
                let available = months_in_year(&choices.months, year);
                let first = *available
                    .first()
                    .ok_or(SelectionError::YearUnavailable(year))?;
                let pane = next.pane_mut(side);
                if !available.contains(&pane.month) {
                    pane.month = first;
                }
                pane.year = year;
            }
            ComparisonAction::SelectMonth { side, month } => {
                let pane = next.pane_mut(side);
                if !months_in_year(&choices.months, pane.year).contains(&month) {
                    return Err(SelectionError::MonthUnavailable {
                        year: pane.year,
                        month,
                    });
                }
                pane.month = month;
            }
            ComparisonAction::SetSync { enabled } => {
                next.sync_enabled = enabled;
                if enabled {
                    next.right.viewport = next.left.viewport;
                }
            }
            ComparisonAction::Pan { side, viewport } => {
                let viewport = Viewport::new(viewport.center, viewport.zoom);
                if next.sync_enabled {
                    next.left.viewport = viewport;
                    next.right.viewport = viewport;
                } else {
                    next.pane_mut(side).viewport = viewport;
                }
            }
        }

        Ok(next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapLayout {
    /// One dual-viewport widget; panning either pane moves both
    Synced,
    /// Two independent maps
    Independent,
}

/// A rendered pane, or the inline error that replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaneView {
    Rendered {
        side: PaneSide,
        title: String,
        tile_url: String,
        attribution: String,
        legend: Legend,
        legend_html: String,
        viewport: Viewport,
        bounds: BoundingBox,
    },
    Error {
        side: PaneSide,
        message: String,
    },
}

impl PaneView {
    pub fn is_rendered(&self) -> bool {
        matches!(self, PaneView::Rendered { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualMapView {
    pub sync_enabled: bool,
    pub layout: MapLayout,
    pub basemap: String,
    pub left: PaneView,
    pub right: PaneView,
}

/// Where panes are rendered.
pub struct RenderContext<'a> {
    pub dataset_id: &'a str,
    pub basemap: &'a str,
    pub width_px: u32,
    pub height_px: u32,
    pub table: &'a VariableTable,
    pub compute: &'a dyn ComputeService,
    pub layers: &'a LayerCache,
}

/// Render both panes concurrently. A failure in one pane becomes that pane's
/// inline error and does not affect the other.
pub async fn render(state: &ComparisonState, ctx: &RenderContext<'_>) -> DualMapView {
    // Identical panes share one layer fetch through the layer cache.
    let (left, right) = futures::join!(
        render_pane(PaneSide::Left, &state.left, ctx),
        render_pane(PaneSide::Right, &state.right, ctx),
    );

    DualMapView {
        sync_enabled: state.sync_enabled,
        layout: if state.sync_enabled {
            MapLayout::Synced
        } else {
            MapLayout::Independent
        },
        basemap: ctx.basemap.to_string(),
        left,
        right,
    }
}

async fn render_pane(side: PaneSide, pane: &MapPaneState, ctx: &RenderContext<'_>) -> PaneView {
    match try_render_pane(side, pane, ctx).await {
        Ok(view) => view,
        Err(e) => {
            warn!(?side, variable = %pane.variable_key, error = %e, "Pane render failed");
            PaneView::Error {
                side,
                message: e.to_string(),
            }
        }
    }
}

async fn try_render_pane(
    side: PaneSide,
    pane: &MapPaneState,
    ctx: &RenderContext<'_>,
) -> Result<PaneView, DashboardError> {
    let option: &VariableOption = ctx
        .table
        .find(&pane.variable_key)
        .ok_or_else(|| DashboardError::UnknownVariable(pane.variable_key.clone()))?;
    let month = pane.year_month()?;

    let key = LayerKey::new(ctx.dataset_id, option.band.clone(), month);
    let layer = ctx
        .layers
        .get_or_fetch(key, || async move {
            debug!(band = %option.band, %month, "Fetching map layer");
            let request = LayerRequest {
                dataset_id: ctx.dataset_id.to_string(),
                band: option.band.clone(),
                month,
                vis: option.visualization_spec.clone(),
            };
            ctx.compute.month_layer(&request).await
        })
        .await?;

    let legend = Legend::from_spec(
        option.display_name.clone(),
        &option.visualization_spec,
        side.legend_side(),
    );

    Ok(PaneView::Rendered {
        side,
        title: format!("{} in {}", option.display_name, month.label()),
        tile_url: layer.url_template,
        attribution: layer.attribution,
        legend_html: legend.to_html(),
        legend,
        viewport: pane.viewport,
        bounds: pane.viewport.bounds(ctx.width_px, ctx.height_px),
    })
}
