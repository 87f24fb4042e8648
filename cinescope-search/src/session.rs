//! Interactive search session: debounced input feeding the orchestrator.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::debounce::QueryDebouncer;
use crate::orchestrator::{SearchOrchestrator, SearchSnapshot};
use crate::providers::MovieSearchProvider;

/// Input pipeline for search-as-you-type front ends.
///
/// On start the empty query is submitted immediately, so the view has an initial
/// result set. Later input values are debounced before reaching the orchestrator.
/// Dropping the session cancels pending input and stops forwarding.
#[derive(Debug)]
pub struct SearchSession {
    orchestrator: Arc<SearchOrchestrator>,
    debouncer: QueryDebouncer,
    forwarder: JoinHandle<()>,
}

impl SearchSession {
    /// Starts a session searching through `provider`.
    pub fn start(provider: Arc<dyn MovieSearchProvider>, debounce_delay: Duration) -> Self {
        let orchestrator = Arc::new(SearchOrchestrator::new(provider));
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let debouncer = QueryDebouncer::spawn_seeded(debounce_delay, tx, "");

        orchestrator.submit("");

        let forward_to = Arc::clone(&orchestrator);
        let forwarder = tokio::spawn(async move {
            while let Some(query) = rx.recv().await {
                debug!(query = %query, "Dispatching debounced query");
                forward_to.submit(query);
            }
        });

        Self {
            orchestrator,
            debouncer,
            forwarder,
        }
    }

    /// Feeds the latest raw input value.
    pub fn input(&self, value: impl Into<String>) {
        self.debouncer.push(value);
    }

    /// Subscribes to search state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.orchestrator.subscribe()
    }

    /// Current search state, cloned.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.orchestrator.snapshot()
    }

    /// Hides the advisory message.
    pub fn dismiss_advisory(&self) {
        self.orchestrator.dismiss_advisory();
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::SearchState;
    use crate::providers::FallbackCatalog;

    async fn wait_for<F>(rx: &mut watch::Receiver<SearchSnapshot>, mut done: F) -> SearchSnapshot
    where
        F: FnMut(&SearchSnapshot) -> bool,
    {
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if done(&*snapshot) {
                    return snapshot.clone();
                }
            }
            rx.changed().await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_browse_then_debounced_query() {
        let session = SearchSession::start(
            Arc::new(FallbackCatalog::curated()),
            Duration::from_millis(400),
        );
        let mut rx = session.subscribe();

        let initial = wait_for(&mut rx, |s| matches!(s.state, SearchState::Success { .. })).await;
        assert_eq!(initial.state.query(), Some(""));
        assert_eq!(initial.visible_records().len(), 8);

        for value in ["f", "fo", "for", "forrest"] {
            session.input(value);
        }

        let done = wait_for(&mut rx, |s| {
            s.state.query() == Some("forrest") && !s.state.is_loading()
        })
        .await;
        assert_eq!(done.visible_records().len(), 1);
        assert_eq!(done.visible_records()[0].id, "tt0109830");
        assert_eq!(done.generation, 2);
    }
}
