//! Search lifecycle state machine with last-query-wins ordering.
//!
//! Every submitted query bumps a generation counter stored alongside the visible
//! state. A search result is applied only if its generation is still current, so a
//! slow response to an old query can never overwrite the answer to a newer one.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::MovieSearchError;
use crate::providers::MovieSearchProvider;
use crate::types::MovieRecord;

/// Advisory shown when a search could not be completed.
pub const SEARCH_FAILED_ADVISORY: &str =
    "Unable to fetch movies right now. Showing fallback if available.";

/// Lifecycle of the current search.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    /// No query has been submitted yet
    #[default]
    Idle,
    /// Waiting on results for `query`
    Loading {
        /// Query being searched
        query: String,
    },
    /// Results for `query`
    Success {
        /// Query that produced `records`
        query: String,
        /// Records in provider order
        records: Vec<MovieRecord>,
    },
    /// The search for `query` could not be completed
    Error {
        /// Query whose search failed
        query: String,
        /// Failure description for logs and diagnostics
        message: String,
    },
}

impl SearchState {
    /// Query that produced this state, `None` while idle.
    pub fn query(&self) -> Option<&str> {
        match self {
            SearchState::Idle => None,
            SearchState::Loading { query }
            | SearchState::Success { query, .. }
            | SearchState::Error { query, .. } => Some(query),
        }
    }

    /// Whether a search is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading { .. })
    }
}

/// Read-only view of the orchestrator published to subscribers.
#[derive(Debug, Clone, Default)]
pub struct SearchSnapshot {
    /// Incremented for every submitted query
    pub generation: u64,
    /// Current lifecycle state
    pub state: SearchState,
    /// Dismissible, non-blocking message for the user
    pub advisory: Option<String>,
    /// Most recent successful result set
    pub retained: Vec<MovieRecord>,
}

impl SearchSnapshot {
    /// Records the view should display.
    ///
    /// While loading or after an error, this is the last successful result set.
    pub fn visible_records(&self) -> &[MovieRecord] {
        match &self.state {
            SearchState::Success { records, .. } => records,
            _ => &self.retained,
        }
    }
}

/// Owns the single [`SearchState`] and applies search results in query order.
#[derive(Debug)]
pub struct SearchOrchestrator {
    provider: Arc<dyn MovieSearchProvider>,
    snapshot: watch::Sender<SearchSnapshot>,
}

impl SearchOrchestrator {
    /// Creates an idle orchestrator searching through `provider`.
    pub fn new(provider: Arc<dyn MovieSearchProvider>) -> Self {
        let (snapshot, _) = watch::channel(SearchSnapshot::default());
        Self { provider, snapshot }
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshot.subscribe()
    }

    /// Current state, cloned.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Starts a search for `query`, superseding any search still in flight.
    ///
    /// The returned handle completes once this search has resolved, whether or not
    /// its result was applied. Earlier searches keep running but their results are
    /// discarded.
    pub fn submit(&self, query: impl Into<String>) -> JoinHandle<()> {
        let query = query.into();
        let mut generation = 0;

        self.snapshot.send_modify(|snapshot| {
            snapshot.generation += 1;
            generation = snapshot.generation;
            snapshot.advisory = None;
            snapshot.state = SearchState::Loading {
                query: query.clone(),
            };
        });

        let provider = Arc::clone(&self.provider);
        let snapshot = self.snapshot.clone();

        tokio::spawn(async move {
            let outcome = dispatch(provider, query.clone()).await;
            apply_outcome(&snapshot, generation, query, outcome);
        })
    }

    /// Hides the advisory message without touching the search state.
    pub fn dismiss_advisory(&self) {
        self.snapshot.send_if_modified(|snapshot| snapshot.advisory.take().is_some());
    }
}

/// Runs the provider on its own task so a panic surfaces as an error state.
async fn dispatch(
    provider: Arc<dyn MovieSearchProvider>,
    query: String,
) -> Result<Vec<MovieRecord>, MovieSearchError> {
    let task_query = query.clone();
    match tokio::spawn(async move { provider.search_movies(&task_query).await }).await {
        Ok(result) => result,
        Err(e) => Err(MovieSearchError::DispatchFailed {
            query,
            reason: e.to_string(),
        }),
    }
}

fn apply_outcome(
    snapshot: &watch::Sender<SearchSnapshot>,
    generation: u64,
    query: String,
    outcome: Result<Vec<MovieRecord>, MovieSearchError>,
) {
    snapshot.send_if_modified(|current| {
        if current.generation != generation {
            debug!(
                query = %query,
                generation,
                current = current.generation,
                "Discarding superseded search result"
            );
            return false;
        }

        match outcome {
            Ok(records) => {
                current.retained = records.clone();
                current.state = SearchState::Success { query, records };
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Search dispatch failed");
                current.advisory = Some(SEARCH_FAILED_ADVISORY.to_string());
                current.state = SearchState::Error {
                    query,
                    message: e.to_string(),
                };
            }
        }
        true
    });
}
