//! Gateway degradation to the curated catalog.

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use cinescope_core::config::{API_BASE_VAR, REQUEST_TIMEOUT_VAR};
use cinescope_core::{CinescopeConfig, SearchConfig};
use cinescope_search::SearchGateway;
use serde_json::json;

use crate::mock_catalog::{MockCatalog, Reply, unreachable_base_url};

const MATRIX_ID: &str = "tt0133093";

fn gateway_for(base_url: &str) -> SearchGateway {
    let config = SearchConfig {
        request_timeout: Duration::from_millis(150),
        ..SearchConfig::with_api_base(base_url)
    };
    SearchGateway::new(&config)
}

fn ids(records: &[cinescope_search::MovieRecord]) -> Vec<&str> {
    records.iter().map(|record| record.id.as_str()).collect()
}

#[tokio::test]
async fn test_remote_results_are_used_when_healthy() {
    let catalog =
        MockCatalog::fixed(Reply::Json(json!([{ "id": "remote-1", "title": "The Matrix" }])))
            .await;
    let gateway = gateway_for(&catalog.base_url);

    let records = gateway.search_movies("matrix").await;
    assert_eq!(ids(&records), vec!["remote-1"]);
}

#[tokio::test]
async fn test_configured_user_agent_is_sent() {
    let catalog = MockCatalog::fixed(Reply::Json(json!([]))).await;
    let gateway = gateway_for(&catalog.base_url);

    gateway.search_movies("heat").await;

    let requests = catalog.requests();
    assert_eq!(
        requests[0].user_agent.as_deref(),
        Some(SearchConfig::default().user_agent)
    );
}

#[tokio::test]
async fn test_empty_remote_result_is_not_replaced() {
    let catalog = MockCatalog::fixed(Reply::Json(json!({ "results": [] }))).await;
    let gateway = gateway_for(&catalog.base_url);

    assert!(gateway.search_movies("matrix").await.is_empty());
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let catalog = MockCatalog::fixed(Reply::Status(StatusCode::SERVICE_UNAVAILABLE)).await;
    let gateway = gateway_for(&catalog.base_url);

    let records = gateway.search_movies("matrix").await;
    assert_eq!(ids(&records), vec![MATRIX_ID]);
    assert_eq!(catalog.queries(), vec!["matrix"]);
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let catalog = MockCatalog::fixed(Reply::Raw("<html>oops</html>")).await;
    let gateway = gateway_for(&catalog.base_url);

    assert_eq!(ids(&gateway.search_movies("MATRIX").await), vec![MATRIX_ID]);
}

#[tokio::test]
async fn test_timeout_falls_back_promptly() {
    let catalog =
        MockCatalog::fixed(Reply::Json(json!([])).after(Duration::from_secs(5))).await;
    let gateway = gateway_for(&catalog.base_url);

    let started = Instant::now();
    let records = gateway.search_movies("").await;

    assert_eq!(records.len(), 8);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_unreachable_catalog_falls_back() {
    let gateway = gateway_for(&unreachable_base_url().await);

    assert_eq!(ids(&gateway.search_movies("matrix").await), vec![MATRIX_ID]);
}

#[tokio::test]
async fn test_no_api_base_never_touches_network() {
    let config = CinescopeConfig::from_lookup(|_| None);
    let gateway = SearchGateway::new(&config.search);

    assert!(!gateway.has_remote());
    assert_eq!(gateway.search_movies("   ").await.len(), 8);
    assert!(gateway.search_movies("no such film").await.is_empty());
}

#[tokio::test]
async fn test_environment_selects_remote_catalog() {
    let catalog = MockCatalog::fixed(Reply::Json(json!([{ "id": "env", "title": "Heat" }]))).await;
    let base_url = catalog.base_url.clone();
    let config = CinescopeConfig::from_lookup(|name| match name {
        API_BASE_VAR => Some(base_url.clone()),
        REQUEST_TIMEOUT_VAR => Some("500".to_string()),
        _ => None,
    });
    let gateway = SearchGateway::new(&config.search);

    assert!(gateway.has_remote());
    assert_eq!(config.search.request_timeout, Duration::from_millis(500));
    assert_eq!(ids(&gateway.search_movies("heat").await), vec!["env"]);
}
