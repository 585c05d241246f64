//! KPI tiles and the seasonal climatology chart for each navigator depth.
//!
//! Every remote reduction is issued independently; a failed KPI becomes an
//! inline error on its tile and a failed climatology month becomes a gap.

use chrono::NaiveDate;
use compute_client::{ComputeService, Reducer, ReductionRequest, Region};
use era5_common::{BoundingBox, DashboardError, GeoPoint, Viewport};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ViewsConfig;
use crate::navigator::Depth;

pub const CLIMATOLOGY_DATASET: &str = "ECMWF/ERA5_LAND/MONTHLY_AGGR";
const CLIMATOLOGY_SCALE_M: f64 = 100_000.0;
const TEMPERATURE_BAND: &str = "temperature_2m";
const PRECIPITATION_BAND: &str = "total_precipitation_sum";
const KELVIN_OFFSET: f64 = -273.15;

const COUNTRY_BUFFER_M: f64 = 50_000.0;
const CITY_BUFFER_M: f64 = 10_000.0;
const COUNTRY_ZOOM: u8 = 5;
const CITY_ZOOM: u8 = 10;

/// A headline statistic shown for one depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiSpec {
    pub key: &'static str,
    pub dataset_id: &'static str,
    pub band: &'static str,
    pub reducer: Reducer,
    pub scale_m: f64,
    pub label: &'static str,
    pub unit: &'static str,
    /// Added to the reduced value before display
    pub offset: f64,
}

const GLOBAL_KPI: KpiSpec = KpiSpec {
    key: "global_temperature",
    dataset_id: CLIMATOLOGY_DATASET,
    band: "mean_2m_air_temperature",
    reducer: Reducer::Mean,
    scale_m: 27_830.0,
    label: "Global Temperature",
    unit: "°C",
    offset: KELVIN_OFFSET,
};

const CONTINENT_KPI: KpiSpec = KpiSpec {
    key: "forest_loss",
    dataset_id: "UMD/hansen/global_forest_change_2024_v1_12",
    band: "lossyear",
    reducer: Reducer::Sum,
    scale_m: 30.0,
    label: "Forest Loss Area",
    unit: "Hectares",
    offset: 0.0,
};

const COUNTRY_KPI: KpiSpec = KpiSpec {
    key: "total_precipitation",
    dataset_id: "UCSB-CHG/CHIRPS/DAILY",
    band: "precipitation",
    reducer: Reducer::Sum,
    scale_m: 5_566.0,
    label: "Total Precipitation",
    unit: "mm",
    offset: 0.0,
};

const CITY_KPI: KpiSpec = KpiSpec {
    key: "nitrogen_dioxide",
    dataset_id: "COPERNICUS/S5P/OFFL/L3_NO2",
    band: "tropospheric_NO2_column_number_density",
    reducer: Reducer::Mean,
    scale_m: 1_113.0,
    label: "Nitrogen Dioxide",
    unit: "mol/m²",
    offset: 0.0,
};

pub fn kpis_for(depth: &Depth) -> Vec<KpiSpec> {
    match depth {
        Depth::Global => vec![GLOBAL_KPI],
        Depth::Continental { .. } => vec![CONTINENT_KPI],
        Depth::National { .. } => vec![COUNTRY_KPI],
        Depth::Citywide { .. } => vec![CITY_KPI],
    }
}

/// Area the KPIs and chart are reduced over.
pub fn region_for(depth: &Depth) -> Region {
    match depth {
        Depth::Global => Region::world(),
        Depth::Continental { continent } => Region::Rectangle {
            bbox: continent.bbox(),
        },
        Depth::National { country, .. } => Region::Buffer {
            center: country.point,
            radius_m: COUNTRY_BUFFER_M,
        },
        Depth::Citywide { city, .. } => Region::Buffer {
            center: city.point,
            radius_m: CITY_BUFFER_M,
        },
    }
}

pub fn viewport_for(depth: &Depth, default: Viewport) -> Viewport {
    match depth {
        Depth::Global => default,
        Depth::Continental { continent } => Viewport::new(continent.center(), continent.zoom()),
        Depth::National { country, .. } => Viewport::new(country.point, COUNTRY_ZOOM),
        Depth::Citywide { city, .. } => Viewport::new(city.point, CITY_ZOOM),
    }
}

pub fn title_for(depth: &Depth) -> String {
    match depth {
        Depth::Global => "Global Climate Overview".to_string(),
        Depth::Continental { continent } => format!("Continental Analysis: {}", continent.name()),
        Depth::National { country, .. } => format!("National Resource Analysis: {}", country.name),
        Depth::Citywide { city, .. } => format!("Urban Climate Analysis: {}", city.name),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTile {
    pub key: String,
    pub label: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClimatologyPoint {
    pub month: u32,
    pub temperature_c: f64,
    pub precipitation_mm: f64,
}

/// Monthly climatology; months in `gaps` have no point.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonalChart {
    pub start_year: i32,
    pub end_year: i32,
    pub points: Vec<ClimatologyPoint>,
    pub gaps: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub depth: &'static str,
    pub region: Region,
    pub bounds: BoundingBox,
    pub viewport: Viewport,
    pub kpis: Vec<KpiTile>,
    pub seasonal: SeasonalChart,
}

fn jan_first(year: i32) -> Result<NaiveDate, DashboardError> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| DashboardError::InternalError(format!("Year {year} out of range")))
}

async fn fetch_kpi(
    compute: &dyn ComputeService,
    spec: KpiSpec,
    region: Region,
    year: i32,
) -> KpiTile {
    let mut tile = KpiTile {
        key: spec.key.to_string(),
        label: spec.label.to_string(),
        unit: spec.unit.to_string(),
        value: None,
        error: None,
    };

    let range = jan_first(year).and_then(|start| Ok((start, jan_first(year + 1)?)));
    let (start, end) = match range {
        Ok(range) => range,
        Err(e) => {
            tile.error = Some(e.to_string());
            return tile;
        }
    };

    let request = ReductionRequest {
        dataset_id: spec.dataset_id.to_string(),
        band: spec.band.to_string(),
        region,
        reducer: spec.reducer,
        scale_m: spec.scale_m,
        start,
        end,
        calendar_month: None,
    };

    match compute.reduce_region(&request).await {
        Ok(Some(value)) => tile.value = Some(value + spec.offset),
        Ok(None) => tile.error = Some("No data for this region".to_string()),
        Err(e) => {
            warn!(kpi = spec.key, error = %e, "KPI reduction failed");
            tile.error = Some(e.to_string());
        }
    }
    tile
}

async fn fetch_climatology(
    compute: &dyn ComputeService,
    region: Region,
    config: &ViewsConfig,
) -> Result<SeasonalChart, DashboardError> {
    let start = jan_first(config.climatology_start)?;
    let end = jan_first(config.climatology_end + 1)?;

    let request = |band: &str, month: u32| ReductionRequest {
        dataset_id: CLIMATOLOGY_DATASET.to_string(),
        band: band.to_string(),
        region,
        reducer: Reducer::Mean,
        scale_m: CLIMATOLOGY_SCALE_M,
        start,
        end,
        calendar_month: Some(month),
    };

    let requests: Vec<(ReductionRequest, ReductionRequest)> = (1..=12)
        .map(|m| (request(TEMPERATURE_BAND, m), request(PRECIPITATION_BAND, m)))
        .collect();

    let results = join_all(requests.iter().map(|(temperature, precipitation)| async move {
        let (t, p) = futures::join!(
            compute.reduce_region(temperature),
            compute.reduce_region(precipitation)
        );
        (t, p)
    }))
    .await;

    let mut chart = SeasonalChart {
        start_year: config.climatology_start,
        end_year: config.climatology_end,
        ..Default::default()
    };

    for (month, result) in (1..=12u32).zip(results) {
        match result {
            (Ok(Some(kelvin)), Ok(Some(metres))) => chart.points.push(ClimatologyPoint {
                month,
                temperature_c: kelvin + KELVIN_OFFSET,
                precipitation_mm: metres * 1000.0,
            }),
            (t, p) => {
                if let Err(e) = t.as_ref().and(p.as_ref()) {
                    debug!(month, error = %e, "Climatology month failed");
                }
                chart.gaps.push(month);
            }
        }
    }

    Ok(chart)
}

/// KPI tiles and seasonal chart for the navigator's current depth.
pub async fn build_view(
    compute: &dyn ComputeService,
    depth: &Depth,
    config: &ViewsConfig,
    default_viewport: Viewport,
) -> Result<DashboardView, DashboardError> {
    let region = region_for(depth);

    let kpis = join_all(
        kpis_for(depth)
            .into_iter()
            .map(|spec| fetch_kpi(compute, spec, region, config.kpi_year)),
    );
    let (kpis, seasonal) = futures::join!(kpis, fetch_climatology(compute, region, config));

    Ok(DashboardView {
        title: title_for(depth),
        depth: depth.name(),
        region,
        bounds: region_bounds(&region),
        viewport: viewport_for(depth, default_viewport),
        kpis,
        seasonal: seasonal?,
    })
}

/// Bounding box of a region, for display.
pub fn region_bounds(region: &Region) -> BoundingBox {
    match region {
        Region::Rectangle { bbox } => *bbox,
        Region::Buffer { center, radius_m } => {
            // One degree of latitude is ~111.32 km.
            let dlat = radius_m / 111_320.0;
            let dlon = dlat / center.lat.to_radians().cos().max(0.01);
            let GeoPoint { lat, lon } = *center;
            BoundingBox::new(
                (lon - dlon).max(-180.0),
                (lat - dlat).max(-90.0),
                (lon + dlon).min(180.0),
                (lat + dlat).min(90.0),
            )
        }
    }
}
