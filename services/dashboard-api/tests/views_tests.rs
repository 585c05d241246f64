//! KPI and climatology views built against the fake compute backend.

use compute_client::Region;
use dashboard_api::config::ViewsConfig;
use dashboard_api::navigator::{Country, Depth};
use dashboard_api::views::build_view;
use era5_common::{Continent, GeoPoint, Viewport};
use test_utils::{assert_approx_eq, FakeCompute};

fn climate() -> FakeCompute {
    FakeCompute::new()
        .with_reduction("temperature_2m", 273.15)
        .with_reduction("total_precipitation_sum", 0.0)
}

#[tokio::test]
async fn test_global_view() {
    let compute = climate().with_reduction("mean_2m_air_temperature", 288.0);

    let view = build_view(&compute, &Depth::Global, &ViewsConfig::default(), Viewport::default())
        .await
        .unwrap();

    assert_eq!(view.title, "Global Climate Overview");
    assert_eq!(view.depth, "global");
    assert_eq!(view.region, Region::world());
    assert_eq!(view.viewport, Viewport::default());

    assert_eq!(view.kpis.len(), 1);
    let kpi = &view.kpis[0];
    assert_eq!(kpi.label, "Global Temperature");
    assert_eq!(kpi.unit, "°C");
    assert_approx_eq!(kpi.value.unwrap(), 14.85, 1e-9);
    assert!(kpi.error.is_none());

    let chart = &view.seasonal;
    assert_eq!((chart.start_year, chart.end_year), (1991, 2020));
    assert_eq!(chart.points.len(), 12);
    assert!(chart.gaps.is_empty());
    // The fake adds the calendar month to each reduction.
    assert_approx_eq!(chart.points[6].temperature_c, 7.0, 1e-9);
    assert_approx_eq!(chart.points[6].precipitation_mm, 7000.0, 1e-9);

    // One KPI plus two reductions per month.
    assert_eq!(compute.reduce_calls(), 25);
}

#[tokio::test]
async fn test_failed_kpi_is_scoped_to_its_tile() {
    let compute = climate().fail_reduction("lossyear");
    let depth = Depth::Continental {
        continent: Continent::SouthAmerica,
    };

    let view = build_view(&compute, &depth, &ViewsConfig::default(), Viewport::default())
        .await
        .unwrap();

    assert_eq!(view.title, "Continental Analysis: South America");
    assert_eq!(view.viewport.center, Continent::SouthAmerica.center());
    let kpi = &view.kpis[0];
    assert_eq!(kpi.label, "Forest Loss Area");
    assert!(kpi.value.is_none());
    assert!(kpi.error.as_deref().unwrap().contains("429"));
    assert_eq!(view.seasonal.points.len(), 12);
}

#[tokio::test]
async fn test_failed_months_become_gaps() {
    let compute = climate()
        .with_reduction("precipitation", 812.0)
        .fail_calendar_month(2)
        .fail_calendar_month(11);
    let depth = Depth::National {
        continent: Continent::Europe,
        country: Country {
            name: "France".to_string(),
            point: GeoPoint::new(46.6, 1.9),
            iso_code: "FR".to_string(),
        },
    };

    let view = build_view(&compute, &depth, &ViewsConfig::default(), Viewport::default())
        .await
        .unwrap();

    assert_eq!(view.kpis[0].value, Some(812.0));
    assert_eq!(view.seasonal.gaps, vec![2, 11]);
    assert_eq!(view.seasonal.points.len(), 10);
    assert!(view.seasonal.points.iter().all(|p| p.month != 2 && p.month != 11));
    assert_eq!(view.viewport.zoom, 5);
    assert!(view.bounds.contains_point(1.9, 46.6));
}

#[tokio::test]
async fn test_region_without_data() {
    let compute = FakeCompute::new();

    let view = build_view(&compute, &Depth::Global, &ViewsConfig::default(), Viewport::default())
        .await
        .unwrap();

    assert_eq!(
        view.kpis[0].error.as_deref(),
        Some("No data for this region")
    );
    assert_eq!(view.seasonal.gaps, (1..=12).collect::<Vec<u32>>());
}

#[tokio::test]
async fn test_configured_window() {
    let compute = climate();
    let config = ViewsConfig {
        kpi_year: 2020,
        climatology_start: 1961,
        climatology_end: 1990,
    };

    let view = build_view(&compute, &Depth::Global, &config, Viewport::default())
        .await
        .unwrap();

    assert_eq!(view.seasonal.start_year, 1961);
    assert_eq!(view.seasonal.end_year, 1990);
}
