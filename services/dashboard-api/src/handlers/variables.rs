//! Variable list and available months.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::Extension, Json};
use era5_common::time::{months_in_year, years_descending};
use era5_common::{DashboardError, YearMonth};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::variable_table::VariableTable;

/// GET /api/variables - selectable variables plus curated keys with no band
pub async fn variables_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<VariableTable>, ApiError> {
    Ok(Json(state.variable_table().await?))
}

#[derive(Debug, Serialize)]
pub struct MonthsResponse {
    pub first: Option<YearMonth>,
    pub last: Option<YearMonth>,
    /// Newest first
    pub years: Vec<i32>,
    pub by_year: BTreeMap<i32, Vec<u32>>,
}

impl MonthsResponse {
    pub fn from_months(months: &[YearMonth]) -> Self {
        let years = years_descending(months);
        let by_year = years
            .iter()
            .map(|&year| (year, months_in_year(months, year)))
            .collect();
        Self {
            first: months.first().copied(),
            last: months.last().copied(),
            years,
            by_year,
        }
    }
}

/// GET /api/months - months with imagery in the configured dataset
pub async fn months_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<MonthsResponse>, ApiError> {
    let months = state
        .available_months()
        .await
        .map_err(DashboardError::from)?;
    Ok(Json(MonthsResponse::from_months(&months)))
}
