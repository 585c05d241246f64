//! Band table extraction from dataset documentation pages.
//!
//! The page lists bands in an HTML table whose header row has (at least)
//! a "Units" and a "Description" column, e.g.
//!
//! | Name | Units | Min | Max | Description |
//!
//! The band id is taken from the "Name" column, or the first column when
//! there is none. Rows with too few cells or an empty id are skipped.

use scraper::{ElementRef, Html, Selector};

use crate::entry::RawBand;
use crate::error::CatalogError;

struct Columns {
    name: usize,
    unit: usize,
    description: usize,
}

impl Columns {
    fn from_headers(headers: &[String]) -> Option<Self> {
        let unit = headers.iter().position(|h| h.contains("units"))?;
        let description = headers.iter().position(|h| h.contains("description"))?;
        let name = headers.iter().position(|h| h == "name").unwrap_or(0);
        Some(Self {
            name,
            unit,
            description,
        })
    }

    fn required_cells(&self) -> usize {
        self.name.max(self.unit).max(self.description) + 1
    }
}

fn selector(css: &str) -> Result<Selector, CatalogError> {
    Selector::parse(css).map_err(|e| CatalogError::Parse(format!("bad selector {}: {:?}", css, e)))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract `(variable_id, unit, description)` rows from the first band table on the page.
pub fn parse_band_table(html: &str) -> Result<Vec<RawBand>, CatalogError> {
    let document = Html::parse_document(html);
    let table_selector = selector("table")?;
    let tr_selector = selector("tr")?;
    let th_selector = selector("th")?;
    let td_selector = selector("td")?;

    for table in document.select(&table_selector) {
        let rows: Vec<ElementRef<'_>> = table.select(&tr_selector).collect();

        let Some((header_index, columns)) = rows.iter().enumerate().find_map(|(i, row)| {
            let headers: Vec<String> = row
                .select(&th_selector)
                .map(|cell| cell_text(cell).to_lowercase())
                .collect();
            Columns::from_headers(&headers).map(|c| (i, c))
        }) else {
            continue;
        };

        let mut bands = Vec::new();
        for row in rows.iter().skip(header_index + 1) {
            let cells: Vec<String> = row.select(&td_selector).map(cell_text).collect();
            if cells.len() < columns.required_cells() {
                continue;
            }

            let variable_id = cells[columns.name].trim();
            if variable_id.is_empty() || variable_id.contains(' ') {
                continue;
            }

            bands.push(RawBand {
                variable_id: variable_id.to_string(),
                unit: cells[columns.unit].clone(),
                description: cells[columns.description].clone(),
            });
        }

        if bands.is_empty() {
            return Err(CatalogError::Parse(
                "band table has no usable rows".to_string(),
            ));
        }

        tracing::debug!(bands = bands.len(), "Parsed band table");
        return Ok(bands);
    }

    Err(CatalogError::Parse(
        "no table with 'Units' and 'Description' columns found".to_string(),
    ))
}
