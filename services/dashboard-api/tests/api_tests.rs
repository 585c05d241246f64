//! End-to-end tests through the HTTP router with fake remote services.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use catalog::{build_catalog, parse_band_table, CatalogStore, MemoryStore};
use dashboard_api::config::DashboardConfig;
use dashboard_api::state::AppState;
use serde_json::{json, Value};
use test_utils::{egypt, france, lyon, FakeCompute, FakeGeocoder, ERA5_DATASET, ERA5_DOCS_HTML};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    compute: Arc<FakeCompute>,
}

async fn app_with(compute: FakeCompute, geocoder: FakeGeocoder) -> TestApp {
    let mut config = DashboardConfig::default();
    // Nothing listens here; any documentation fetch fails fast.
    config.catalog.docs_base_url = "http://127.0.0.1:9".to_string();

    let store = MemoryStore::new();
    let catalog = build_catalog(&parse_band_table(ERA5_DOCS_HTML).unwrap());
    store.save(ERA5_DATASET, &catalog).await.unwrap();

    let compute = Arc::new(compute);
    let state = AppState::with_services(
        config,
        compute.clone(),
        Arc::new(geocoder),
        Arc::new(store),
    )
    .unwrap();

    TestApp {
        router: dashboard_api::router(Arc::new(state)),
        compute,
    }
}

async fn app() -> TestApp {
    app_with(
        FakeCompute::new()
            .with_reduction("temperature_2m", 280.0)
            .with_reduction("total_precipitation_sum", 0.002)
            .with_reduction("mean_2m_air_temperature", 287.0),
        FakeGeocoder::new()
            .respond("France", vec![france()])
            .respond("Egypt", vec![egypt()])
            .respond("Lyon", vec![lyon()]),
    )
    .await
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(router, Method::GET, uri, None).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, body) = send(router, Method::POST, uri, Some(body)).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = get_json(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["dataset"], ERA5_DATASET);
}

#[tokio::test]
async fn test_variables_filtered_and_resolved() {
    let app = app().await;

    let (status, body) = get_json(&app.router, "/api/variables").await;
    assert_eq!(status, StatusCode::OK);

    let keys: Vec<&str> = body["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys.first(), Some(&"temperature_2m"));
    assert!(!keys.contains(&"snow_depth"));
    assert_eq!(body["missing"], json!(["snow_depth", "runoff_sum"]));
    assert_eq!(body["options"][0]["unit"], "C");

    // The live band list is held in the snapshot cache.
    get_json(&app.router, "/api/variables").await;
    assert_eq!(app.compute.band_calls(), 1);
}

#[tokio::test]
async fn test_months() {
    let app = app().await;
    let (status, body) = get_json(&app.router, "/api/months").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["years"][0], 2025);
    assert_eq!(body["by_year"]["2025"], json!([1, 2, 3, 4, 5, 6]));
    assert_eq!(body["first"], json!({"year": 1950, "month": 1}));
}

#[tokio::test]
async fn test_catalog_served_from_store() {
    let app = app().await;
    let (status, body) = get_json(&app.router, "/api/catalog/ECMWF/ERA5_LAND/MONTHLY_AGGR").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dataset_id"], ERA5_DATASET);
    assert_eq!(body["variables"].as_array().unwrap().len(), 13);
}

#[tokio::test]
async fn test_catalog_fetch_failure_is_bad_gateway() {
    let app = app().await;
    let (status, body) = get_json(&app.router, "/api/catalog/NOAA/UNKNOWN").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "RemoteServiceError");
}

#[tokio::test]
async fn test_comparison_flow() {
    let app = app().await;

    let (status, body) = post_json(&app.router, "/api/comparison", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let state = body["state"].clone();
    assert_eq!(state["left"]["variable_key"], "temperature_2m");
    assert_eq!(state["left"]["year"], 2025);
    assert_eq!(state["left"]["month"], 1);
    assert_eq!(state["sync_enabled"], true);

    let (status, body) = post_json(
        &app.router,
        "/api/comparison",
        json!({
            "state": state,
            "action": {"type": "select_variable", "side": "right", "key": "surface_pressure"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let state = body["state"].clone();
    assert_eq!(state["right"]["variable_key"], "surface_pressure");

    let (status, body) = post_json(&app.router, "/api/comparison/render", json!({ "state": state })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["layout"], "synced");
    assert_eq!(body["left"]["status"], "rendered");
    assert_eq!(body["right"]["title"], "Surface Pressure in January 2025");
    assert!(body["right"]["legend_html"].as_str().unwrap().contains("Surface Pressure"));
}

#[tokio::test]
async fn test_comparison_rejects_unavailable_month() {
    let app = app().await;
    let (_, body) = post_json(&app.router, "/api/comparison", json!({})).await;

    let (status, body) = post_json(
        &app.router,
        "/api/comparison",
        json!({
            "state": body["state"],
            "action": {"type": "select_month", "side": "left", "month": 9}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "SelectionError");
    assert_eq!(body["message"], "Month 9 is not available in 2025");
}

#[tokio::test]
async fn test_render_isolates_pane_failure() {
    let app = app_with(
        FakeCompute::new().fail_band("temperature_2m"),
        FakeGeocoder::new(),
    )
    .await;
    let (_, body) = post_json(&app.router, "/api/comparison", json!({})).await;
    let mut state = body["state"].clone();
    state["right"]["variable_key"] = json!("total_precipitation_sum");

    let (status, body) = post_json(&app.router, "/api/comparison/render", json!({ "state": state })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["left"]["status"], "error");
    assert_eq!(body["right"]["status"], "rendered");
}

#[tokio::test]
async fn test_render_clamps_client_zoom() {
    let app = app().await;
    let (_, body) = post_json(&app.router, "/api/comparison", json!({})).await;
    let mut state = body["state"].clone();
    state["left"]["viewport"]["zoom"] = json!(40);
    state["right"]["viewport"]["zoom"] = json!(255);

    let (status, body) = post_json(&app.router, "/api/comparison/render", json!({ "state": state })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["left"]["status"], "rendered");
    assert_eq!(body["left"]["viewport"]["zoom"], 18);
    assert_eq!(body["right"]["viewport"]["zoom"], 18);
    let width = body["left"]["bounds"]["max_x"].as_f64().unwrap()
        - body["left"]["bounds"]["min_x"].as_f64().unwrap();
    assert!(width > 0.0 && width < 0.01);
}

#[tokio::test]
async fn test_navigator_rejects_country_on_other_continent() {
    let app = app().await;
    let state = json!({"depth": "continental", "continent": "europe"});

    let (status, body) = post_json(
        &app.router,
        "/api/navigator",
        json!({"state": state, "action": {"type": "search_country", "query": "Egypt"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], state);
    assert_eq!(body["warning"], "Egypt is not in Europe");
}

#[tokio::test]
async fn test_navigator_drill_down_and_view() {
    let app = app().await;

    let (_, body) = post_json(
        &app.router,
        "/api/navigator",
        json!({"action": {"type": "select_continent", "continent": "europe"}}),
    )
    .await;
    let (_, body) = post_json(
        &app.router,
        "/api/navigator",
        json!({"state": body["state"], "action": {"type": "search_country", "query": "France"}}),
    )
    .await;
    assert_eq!(body["state"]["depth"], "national");
    assert!(body.get("warning").is_none());

    let (_, body) = post_json(
        &app.router,
        "/api/navigator",
        json!({"state": body["state"], "action": {"type": "search_city", "query": "Lyon"}}),
    )
    .await;
    let state = body["state"].clone();
    assert_eq!(state["depth"], "citywide");
    assert_eq!(state["city"]["name"], "Lyon");
    assert_eq!(body["selection"]["country"]["iso_code"], "FR");

    let (status, body) = post_json(&app.router, "/api/view", json!({ "navigator": state })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Urban Climate Analysis: Lyon");
    assert_eq!(body["region"]["type"], "buffer");
    assert_eq!(body["region"]["radius_m"], 10_000.0);
    assert_eq!(body["kpis"][0]["label"], "Nitrogen Dioxide");
    // No NO2 reduction is scripted, so the tile carries an inline error.
    assert!(body["kpis"][0]["error"].is_string());
    assert_eq!(body["seasonal"]["points"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_global_view_by_default() {
    let app = app().await;
    let (status, body) = post_json(&app.router, "/api/view", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["depth"], "global");
    let value = body["kpis"][0]["value"].as_f64().unwrap();
    assert!((value - 13.85).abs() < 1e-9);
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let app = app().await;
    let (status, body) = send(&app.router, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("layer_cache_entries 0"));
}
