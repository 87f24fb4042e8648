//! Debounced input through the orchestrator and gateway to a live catalog.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use cinescope_core::SearchConfig;
use cinescope_search::{
    SearchGateway, SearchOrchestrator, SearchSession, SearchSnapshot, SearchState,
};
use tokio::sync::watch;

use crate::mock_catalog::{MockCatalog, Reply, titles_matching};

const TITLES: &[&str] = &["The Matrix", "The Matrix Reloaded", "Heat", "Alien"];
const DEBOUNCE: Duration = Duration::from_millis(50);

fn gateway_for(base_url: &str) -> Arc<SearchGateway> {
    let config = SearchConfig {
        request_timeout: Duration::from_secs(2),
        ..SearchConfig::with_api_base(base_url)
    };
    Arc::new(SearchGateway::new(&config))
}

async fn settled(rx: &mut watch::Receiver<SearchSnapshot>, query: &str) -> SearchSnapshot {
    let snapshot = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.state.query() == Some(query) && !s.state.is_loading()),
    )
    .await
    .expect("search did not settle")
    .expect("orchestrator dropped");
    snapshot.clone()
}

fn titles(snapshot: &SearchSnapshot) -> Vec<&str> {
    snapshot
        .visible_records()
        .iter()
        .map(|record| record.title.as_str())
        .collect()
}

#[tokio::test]
async fn test_typing_burst_sends_one_remote_request() {
    let catalog = MockCatalog::start(|query| titles_matching(TITLES, query)).await;
    let session = SearchSession::start(gateway_for(&catalog.base_url), DEBOUNCE);
    let mut rx = session.subscribe();

    let initial = settled(&mut rx, "").await;
    assert_eq!(titles(&initial), TITLES.to_vec());

    for value in ["m", "ma", "mat", "matr", "matrix"] {
        session.input(value);
    }

    let done = settled(&mut rx, "matrix").await;
    assert_eq!(titles(&done), vec!["The Matrix", "The Matrix Reloaded"]);
    assert_eq!(done.generation, 2);
    assert_eq!(catalog.queries(), vec!["", "matrix"]);
}

#[tokio::test]
async fn test_slow_response_never_overwrites_newer_query() {
    let catalog = MockCatalog::start(|query| {
        let reply = titles_matching(TITLES, query);
        if query == "alien" {
            reply.after(Duration::from_millis(300))
        } else {
            reply
        }
    })
    .await;
    let orchestrator = SearchOrchestrator::new(gateway_for(&catalog.base_url));

    let stale = orchestrator.submit("alien");
    let fresh = orchestrator.submit("heat");
    fresh.await.unwrap();
    stale.await.unwrap();

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.generation, 2);
    match &snapshot.state {
        SearchState::Success { query, records } => {
            assert_eq!(query, "heat");
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].title, "Heat");
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(catalog.requests().len(), 2);
}

#[tokio::test]
async fn test_failing_catalog_still_shows_results() {
    let catalog = MockCatalog::fixed(Reply::Status(StatusCode::BAD_GATEWAY)).await;
    let session = SearchSession::start(gateway_for(&catalog.base_url), DEBOUNCE);
    let mut rx = session.subscribe();

    let initial = settled(&mut rx, "").await;
    assert_eq!(initial.visible_records().len(), 8);

    session.input("godfather");
    let done = settled(&mut rx, "godfather").await;

    assert_eq!(titles(&done), vec!["The Godfather", "The Godfather Part II"]);
    assert!(done.advisory.is_none());
    assert!(matches!(done.state, SearchState::Success { .. }));
}
