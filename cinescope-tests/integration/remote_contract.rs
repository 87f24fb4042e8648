//! Remote provider against a live HTTP catalog.

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use cinescope_search::normalizer::UNTITLED;
use cinescope_search::{MovieSearchError, MovieSearchProvider, RemoteCatalogProvider};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use crate::mock_catalog::{MockCatalog, Reply};

const TIMEOUT: Duration = Duration::from_secs(2);

fn omdb_items() -> serde_json::Value {
    json!([
        {
            "imdbID": "tt0133093",
            "Name": "The Matrix",
            "Year": "1999",
            "Poster": "https://img.example.com/matrix.jpg",
            "imdbRating": "8.7",
            "Genre": "Action, Sci-Fi",
            "Plot": "A hacker learns the truth about his reality."
        },
        { "Year": "N/A", "Poster": "N/A" }
    ])
}

#[tokio::test]
async fn test_bare_array_is_normalized() {
    let catalog = MockCatalog::fixed(Reply::Json(omdb_items())).await;
    let provider = RemoteCatalogProvider::new(&catalog.base_url, TIMEOUT);

    let records = assert_ok!(provider.search_movies("matrix").await);

    assert_eq!(records.len(), 2);
    let matrix = &records[0];
    assert_eq!(matrix.id, "tt0133093");
    assert_eq!(matrix.title, "The Matrix");
    assert_eq!(matrix.year, Some(1999));
    assert_eq!(matrix.rating, Some(8.7));
    assert_eq!(
        matrix.genres,
        Some(vec!["Action".to_string(), "Sci-Fi".to_string()])
    );
    assert_eq!(
        matrix.overview.as_deref(),
        Some("A hacker learns the truth about his reality.")
    );

    let sparse = &records[1];
    assert_eq!(sparse.title, UNTITLED);
    assert_eq!(sparse.id.len(), 16);
    assert_eq!(sparse.year, None);
    assert_eq!(sparse.poster_url, None);
}

#[tokio::test]
async fn test_results_wrapper_is_unwrapped() {
    let body = json!({
        "page": 1,
        "results": [{ "id": 42, "title": "Heat", "year": 1995, "runtime": 170 }]
    });
    let catalog = MockCatalog::fixed(Reply::Json(body)).await;
    let provider = RemoteCatalogProvider::new(&catalog.base_url, TIMEOUT);

    let records = assert_ok!(provider.search_movies("heat").await);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "42");
    assert_eq!(records[0].title, "Heat");
    assert_eq!(records[0].runtime, Some(170));
}

#[tokio::test]
async fn test_object_without_results_is_empty() {
    let catalog = MockCatalog::fixed(Reply::Json(json!({ "page": 1 }))).await;
    let provider = RemoteCatalogProvider::new(&catalog.base_url, TIMEOUT);

    let records = assert_ok!(provider.search_movies("anything").await);
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_request_shape() {
    let catalog = MockCatalog::fixed(Reply::Json(json!([]))).await;
    let provider = RemoteCatalogProvider::new(&catalog.base_url, TIMEOUT);

    assert_ok!(provider.search_movies("  amélie & co ").await);

    let requests = catalog.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query.as_deref(), Some("amélie & co"));
    assert_eq!(
        requests[0].raw_query.as_deref(),
        Some("q=am%C3%A9lie%20%26%20co")
    );
    assert_eq!(requests[0].accept.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_supplied_client_is_used() {
    let catalog = MockCatalog::fixed(Reply::Json(json!([]))).await;
    let client = reqwest::Client::builder()
        .user_agent("cinescope-tests/1.0")
        .build()
        .unwrap();
    let provider = RemoteCatalogProvider::with_client(client, &catalog.base_url, TIMEOUT);

    assert_ok!(provider.search_movies("heat").await);

    let requests = catalog.requests();
    assert_eq!(requests[0].user_agent.as_deref(), Some("cinescope-tests/1.0"));
    assert_eq!(requests[0].accept.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_base_url_with_path_and_trailing_slash() {
    let catalog = MockCatalog::fixed(Reply::Json(json!([{ "title": "Alien" }]))).await;
    let provider = RemoteCatalogProvider::new(format!("{}/api/", catalog.base_url), TIMEOUT);

    let records = assert_ok!(provider.search_movies("alien").await);
    assert_eq!(records[0].title, "Alien");
}

#[tokio::test]
async fn test_server_error_is_network_failure() {
    let catalog = MockCatalog::fixed(Reply::Status(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let provider = RemoteCatalogProvider::new(&catalog.base_url, TIMEOUT);

    let error = assert_err!(provider.search_movies("heat").await);
    assert!(error.is_network(), "unexpected error: {error}");
}

#[tokio::test]
async fn test_malformed_body_is_parse_failure() {
    let catalog = MockCatalog::fixed(Reply::Raw("{\"results\": [")).await;
    let provider = RemoteCatalogProvider::new(&catalog.base_url, TIMEOUT);

    let error = assert_err!(provider.search_movies("heat").await);
    assert!(matches!(error, MovieSearchError::ParseFailure { .. }));
}

#[tokio::test]
async fn test_non_array_results_is_parse_failure() {
    let catalog = MockCatalog::fixed(Reply::Json(json!({ "results": "none" }))).await;
    let provider = RemoteCatalogProvider::new(&catalog.base_url, TIMEOUT);

    let error = assert_err!(provider.search_movies("heat").await);
    assert!(matches!(error, MovieSearchError::ParseFailure { .. }));
}

#[tokio::test]
async fn test_slow_catalog_is_aborted_at_timeout() {
    let catalog =
        MockCatalog::fixed(Reply::Json(json!([])).after(Duration::from_secs(5))).await;
    let provider = RemoteCatalogProvider::new(&catalog.base_url, Duration::from_millis(100));

    let started = Instant::now();
    let error = assert_err!(provider.search_movies("heat").await);

    assert!(error.is_network());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_unreachable_catalog_is_network_failure() {
    let base = crate::mock_catalog::unreachable_base_url().await;
    let provider = RemoteCatalogProvider::new(base, TIMEOUT);

    let error = assert_err!(provider.search_movies("heat").await);
    assert!(error.is_network());
}
