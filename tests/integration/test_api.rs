//! HTTP API tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use realty::analysis::{AnalysisEngine, NEED_TWO_LOCATIONS};
use realty::config::ServerConfig;
use realty::dataset::{CachedDataset, DatasetSchema};
use realty::summarizer::DisabledSummarizer;
use realty::{create_router, ApiState};

const MARKET_CSV: &str = "\
Final Location,Year,City,Flat Weighted Avg Rate,Total Sales Demand
Wakad,2021,Pune,150,80
Aundh,2020,Pune,200,40
Wakad,2020,Pune,100,90
Aundh,2022,Pune,260.4,45
";

fn write_dataset(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("market.csv");
    std::fs::write(&path, content).unwrap();
    path
}

fn router_for(path: &Path, config: &ServerConfig) -> Router {
    let state = ApiState::new(
        Arc::new(CachedDataset::new(path, None, DatasetSchema::default())),
        AnalysisEngine::new(Arc::new(DisabledSummarizer), DatasetSchema::default()),
    );
    create_router(Arc::new(state), config)
}

fn market_router() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, MARKET_CSV);
    let router = router_for(&path, &ServerConfig::default());
    (dir, router)
}

fn analyze_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_analyze_single_area() {
    let (_dir, router) = market_router();

    let (status, body) = send_json(
        &router,
        analyze_request("/api/analyze", r#"{"message": "How is Wakad doing?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["queryType"], "single_area");
    assert_eq!(body["locations"], json!(["Wakad"]));
    assert_eq!(
        body["summary"],
        "Analysis for Wakad from 2020 to 2021: \
         • Prices have increased from 100 to 150. \
         • Demand has decreased from 90 to 80."
    );

    assert_eq!(body["chartData"]["labels"], json!([2020, 2021]));
    let datasets = body["chartData"]["datasets"].as_array().unwrap();
    assert_eq!(datasets.len(), 2);
    assert_eq!(datasets[0]["label"], "Average Price");
    assert_eq!(datasets[0]["data"][1].as_f64(), Some(150.0));
    assert_eq!(datasets[1]["label"], "Demand");

    let table = body["tableData"].as_array().unwrap();
    assert_eq!(table.len(), 2);
    let keys: Vec<&String> = table[0].as_object().unwrap().keys().collect();
    assert_eq!(
        keys,
        vec![
            "year",
            "city",
            "final_location",
            "flat_weighted_avg_rate",
            "total_sales_demand"
        ]
    );
    assert_eq!(table[0]["year"], 2020);
}

#[tokio::test]
async fn test_analyze_trailing_slash() {
    let (_dir, router) = market_router();

    let (status, body) = send_json(
        &router,
        analyze_request("/api/analyze/", r#"{"message": "demand trend in aundh"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["queryType"], "demand_trend");
    assert_eq!(body["summary"], "Demand for Aundh has increased.");
}

#[tokio::test]
async fn test_analyze_requires_message() {
    let (_dir, router) = market_router();

    for body in [r#"{"message": "   "}"#, r#"{}"#, "not json", r#"{"message": 42}"#] {
        let (status, payload) = send_json(&router, analyze_request("/api/analyze", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(payload["error"], "Message text is required");
    }
}

#[tokio::test]
async fn test_analyze_unknown_location() {
    let (_dir, router) = market_router();

    let (status, body) = send_json(
        &router,
        analyze_request("/api/analyze", r#"{"message": "What about Kothrud?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No matching location found in dataset.");
    assert_eq!(body["locations_available"], json!(["Wakad", "Aundh"]));
}

#[tokio::test]
async fn test_analyze_compare() {
    let (_dir, router) = market_router();

    let (status, body) = send_json(
        &router,
        analyze_request("/api/analyze", r#"{"message": "Aundh vs Wakad"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["queryType"], "compare");
    assert_eq!(body["locations"], json!(["Wakad", "Aundh"]));
    // Only Aundh has a row for the latest year.
    assert_eq!(body["summary"], "Aundh: ~260");
    assert_eq!(body["chartData"], json!({"labels": [], "datasets": []}));
    assert_eq!(body["tableData"], json!([]));
}

#[tokio::test]
async fn test_analyze_compare_single_location_is_not_an_error() {
    let (_dir, router) = market_router();

    let (status, body) = send_json(
        &router,
        analyze_request("/api/analyze", r#"{"message": "compare Kothrud"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["locations"], json!([]));
    assert_eq!(body["summary"], NEED_TWO_LOCATIONS);
}

#[tokio::test]
async fn test_download_csv() {
    let (_dir, router) = market_router();

    let response = router
        .clone()
        .oneshot(get_request("/api/download/?area=wakad"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"wakad_data.csv\""
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "final_location,year,city,flat_weighted_avg_rate,total_sales_demand",
            "Wakad,2021,Pune,150,80",
            "Wakad,2020,Pune,100,90",
        ]
    );
}

#[tokio::test]
async fn test_download_errors() {
    let (_dir, router) = market_router();

    let (status, body) = send_json(&router, get_request("/api/download")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "area query parameter is required");

    let (status, _) = send_json(&router, get_request("/api/download?area=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(&router, get_request("/api/download?area=Kothrud")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No data found for Kothrud");
}

#[tokio::test]
async fn test_locations() {
    let (_dir, router) = market_router();

    let (status, body) = send_json(&router, get_request("/api/locations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"locations": ["Wakad", "Aundh"], "total": 2}));
}

#[tokio::test]
async fn test_missing_dataset_is_internal_error() {
    let dir = TempDir::new().unwrap();
    let router = router_for(&dir.path().join("absent.csv"), &ServerConfig::default());

    let (status, body) = send_json(
        &router,
        analyze_request("/api/analyze", r#"{"message": "Wakad"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Internal Server Error:"));

    // Validation still happens before the dataset is touched.
    let (status, _) = send_json(&router, get_request("/api/download")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dataset_without_location_column() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, "area,year\nWakad,2020\n");
    let router = router_for(&path, &ServerConfig::default());

    let (status, body) = send_json(&router, get_request("/api/locations")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("final_location"));
}

#[tokio::test]
async fn test_health_and_custom_prefix() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, MARKET_CSV);
    let config = ServerConfig {
        prefix: "/v1".to_string(),
        ..Default::default()
    };
    let router = router_for(&path, &config);

    let (status, body) = send(&router, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    let (status, _) = send(&router, get_request("/v1/locations")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, get_request("/api/locations")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (_dir, router) = market_router();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/analyze")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
