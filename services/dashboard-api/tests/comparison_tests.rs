//! Dual-map rendering against the fake compute backend.

use catalog::{build_catalog, parse_band_table};
use compute_client::ComputeService;
use dashboard_api::comparison::{
    render, Choices, ComparisonAction, ComparisonState, MapLayout, PaneSide, PaneView,
    RenderContext,
};
use dashboard_api::layer_cache::LayerCache;
use dashboard_api::variable_table::VariableTable;
use era5_common::legend::format_value;
use era5_common::{GeoPoint, Viewport, YearMonth};
use test_utils::{live_bands, FakeCompute, ERA5_DATASET, ERA5_DOCS_HTML};
use variables::{curated::default_curated, Denylist};

fn table() -> VariableTable {
    let catalog = build_catalog(&parse_band_table(ERA5_DOCS_HTML).unwrap());
    VariableTable::build(&default_curated(), &Denylist::default(), &catalog, &live_bands())
}

fn compute() -> FakeCompute {
    FakeCompute::new().with_months(
        YearMonth::new(2023, 1).unwrap(),
        YearMonth::new(2024, 6).unwrap(),
    )
}

fn context<'a>(
    table: &'a VariableTable,
    compute: &'a dyn ComputeService,
    layers: &'a LayerCache,
) -> RenderContext<'a> {
    RenderContext {
        dataset_id: ERA5_DATASET,
        basemap: "CartoDB positron",
        width_px: 800,
        height_px: 600,
        table,
        compute,
        layers,
    }
}

fn initial(table: &VariableTable) -> ComparisonState {
    let months = YearMonth::range_inclusive(
        YearMonth::new(2023, 1).unwrap(),
        YearMonth::new(2024, 6).unwrap(),
    );
    ComparisonState::initial(&Choices::new(table, months), Viewport::default()).unwrap()
}

fn choices(table: &VariableTable) -> Choices {
    Choices::new(
        table,
        YearMonth::range_inclusive(
            YearMonth::new(2023, 1).unwrap(),
            YearMonth::new(2024, 6).unwrap(),
        ),
    )
}

fn bounds(view: &PaneView) -> era5_common::BoundingBox {
    match view {
        PaneView::Rendered { bounds, .. } => *bounds,
        PaneView::Error { message, .. } => panic!("pane failed: {message}"),
    }
}

#[tokio::test]
async fn test_initial_render() {
    let table = table();
    let compute = compute();
    let layers = LayerCache::new(16, 300);
    let state = initial(&table);

    let view = render(&state, &context(&table, &compute, &layers)).await;

    assert!(view.sync_enabled);
    assert_eq!(view.layout, MapLayout::Synced);
    match &view.left {
        PaneView::Rendered {
            title,
            tile_url,
            legend,
            legend_html,
            ..
        } => {
            assert_eq!(title, "Temperature 2m in January 2024");
            assert!(tile_url.contains("/temperature_2m/2024-01/"));
            assert_eq!(legend.min_label, format_value(220.0));
            assert!(legend_html.contains("Temperature 2m"));
        }
        PaneView::Error { message, .. } => panic!("left pane failed: {message}"),
    }
    // Identical panes share one layer.
    assert_eq!(compute.layer_calls(), 1);
}

#[tokio::test]
async fn test_second_render_uses_cached_layers() {
    let table = table();
    let compute = compute();
    let layers = LayerCache::new(16, 300);
    let state = initial(&table)
        .apply(
            ComparisonAction::SelectVariable {
                side: PaneSide::Right,
                key: "total_precipitation_sum".to_string(),
            },
            &choices(&table),
        )
        .unwrap();
    let ctx = context(&table, &compute, &layers);

    let first = render(&state, &ctx).await;
    assert_eq!(compute.layer_calls(), 2);

    let second = render(&state, &ctx).await;
    assert_eq!(compute.layer_calls(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_failed_pane_does_not_affect_other() {
    let table = table();
    let compute = compute().fail_band("surface_pressure");
    let layers = LayerCache::new(16, 300);
    let state = initial(&table)
        .apply(
            ComparisonAction::SelectVariable {
                side: PaneSide::Right,
                key: "surface_pressure".to_string(),
            },
            &choices(&table),
        )
        .unwrap();

    let view = render(&state, &context(&table, &compute, &layers)).await;

    assert!(view.left.is_rendered());
    match &view.right {
        PaneView::Error { side, message } => {
            assert_eq!(*side, PaneSide::Right);
            assert!(message.contains("HTTP 500"), "{message}");
        }
        other => panic!("expected right pane error, got {other:?}"),
    }
    // Failures are not cached, so a retry calls the backend again.
    render(&state, &context(&table, &compute, &layers)).await;
    assert_eq!(compute.layer_calls(), 3);
}

#[tokio::test]
async fn test_unsynced_pan_leaves_other_pane_alone() {
    let table = table();
    let compute = compute();
    let layers = LayerCache::new(16, 300);
    let choices = choices(&table);

    let unsynced = initial(&table)
        .apply(ComparisonAction::SetSync { enabled: false }, &choices)
        .unwrap();
    let before = render(&unsynced, &context(&table, &compute, &layers)).await;
    assert_eq!(before.layout, MapLayout::Independent);

    let panned = unsynced
        .apply(
            ComparisonAction::Pan {
                side: PaneSide::Left,
                viewport: Viewport::new(GeoPoint::new(-33.9, 18.4), 8),
            },
            &choices,
        )
        .unwrap();
    let after = render(&panned, &context(&table, &compute, &layers)).await;

    assert_eq!(panned.right.viewport, unsynced.right.viewport);
    assert_eq!(bounds(&after.right), bounds(&before.right));
    assert_ne!(bounds(&after.left), bounds(&before.left));
    assert!(bounds(&after.left).contains_point(18.4, -33.9));
}

#[tokio::test]
async fn test_month_outside_extent_is_inline_error() {
    let table = table();
    let compute = compute();
    let layers = LayerCache::new(16, 300);
    let mut state = initial(&table);
    state.right.year = 2030;

    let view = render(&state, &context(&table, &compute, &layers)).await;

    assert!(view.left.is_rendered());
    assert!(matches!(view.right, PaneView::Error { .. }));
}
