//! Search gateway: remote catalog with graceful degradation to local data.

use async_trait::async_trait;
use cinescope_core::SearchConfig;
use tracing::{debug, warn};

use crate::errors::MovieSearchError;
use crate::providers::{FallbackCatalog, MovieSearchProvider, RemoteCatalogProvider};
use crate::types::MovieRecord;

/// Entry point the view layer calls to search the catalog.
///
/// Uses the remote provider when one is configured. Every remote failure (transport,
/// status, timeout, malformed body) is logged and answered from the fallback catalog,
/// so [`SearchGateway::search_movies`] never fails.
#[derive(Debug)]
pub struct SearchGateway {
    remote: Option<Box<dyn MovieSearchProvider>>,
    fallback: FallbackCatalog,
}

impl SearchGateway {
    /// Creates the gateway from startup configuration.
    pub fn new(config: &SearchConfig) -> Self {
        let remote = RemoteCatalogProvider::from_config(config)
            .map(|provider| Box::new(provider) as Box<dyn MovieSearchProvider>);

        Self {
            remote,
            fallback: FallbackCatalog::curated().with_browse_limit(config.fallback_limit),
        }
    }

    /// Creates a gateway that always answers from the curated fallback catalog.
    pub fn fallback_only() -> Self {
        Self {
            remote: None,
            fallback: FallbackCatalog::curated(),
        }
    }

    /// Creates a gateway with an explicit remote provider and fallback catalog.
    pub fn with_remote(remote: Box<dyn MovieSearchProvider>, fallback: FallbackCatalog) -> Self {
        Self {
            remote: Some(remote),
            fallback,
        }
    }

    /// Whether searches are attempted against a remote provider first.
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Searches for movies matching `query`. Never fails.
    pub async fn search_movies(&self, query: &str) -> Vec<MovieRecord> {
        let query = query.trim();

        let Some(remote) = &self.remote else {
            debug!("Using fallback catalog (no API_BASE configured)");
            return self.fallback.lookup(query);
        };

        match remote.search_movies(query).await {
            Ok(records) => {
                debug!(query, count = records.len(), "Remote search succeeded");
                records
            }
            Err(e) => {
                warn!(query, error = %e, "Search error, using fallback catalog");
                self.fallback.lookup(query)
            }
        }
    }
}

#[async_trait]
impl MovieSearchProvider for SearchGateway {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieRecord>, MovieSearchError> {
        Ok(Self::search_movies(self, query).await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Remote provider answering with a fixed outcome and recording queries.
    #[derive(Debug)]
    struct ScriptedRemote {
        outcome: fn() -> Result<Vec<MovieRecord>, MovieSearchError>,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedRemote {
        fn boxed(
            outcome: fn() -> Result<Vec<MovieRecord>, MovieSearchError>,
        ) -> (Box<dyn MovieSearchProvider>, Arc<Mutex<Vec<String>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let remote = Self {
                outcome,
                seen: Arc::clone(&seen),
            };
            (Box::new(remote), seen)
        }
    }

    #[async_trait]
    impl MovieSearchProvider for ScriptedRemote {
        async fn search_movies(&self, query: &str) -> Result<Vec<MovieRecord>, MovieSearchError> {
            self.seen.lock().unwrap().push(query.to_string());
            (self.outcome)()
        }
    }

    fn network_down() -> Result<Vec<MovieRecord>, MovieSearchError> {
        Err(MovieSearchError::NetworkFailure {
            reason: "Search failed with status 503 Service Unavailable".to_string(),
        })
    }

    fn garbled() -> Result<Vec<MovieRecord>, MovieSearchError> {
        Err(MovieSearchError::ParseFailure {
            reason: "expected value at line 1 column 1".to_string(),
        })
    }

    fn one_remote_hit() -> Result<Vec<MovieRecord>, MovieSearchError> {
        Ok(vec![MovieRecord::new("remote-1", "Heat")])
    }

    #[tokio::test]
    async fn test_no_endpoint_uses_fallback() {
        let gateway = SearchGateway::new(&SearchConfig::default());
        assert!(!gateway.has_remote());

        let results = gateway.search_movies("Dark Knight").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "tt0468569");

        let browse = gateway.search_movies("").await;
        assert_eq!(browse, FallbackCatalog::curated().lookup(""));
        assert_eq!(browse.len(), 8);
    }

    #[tokio::test]
    async fn test_configured_fallback_limit_applies() {
        let config = SearchConfig {
            fallback_limit: 2,
            ..SearchConfig::default()
        };
        let gateway = SearchGateway::new(&config);
        assert_eq!(gateway.search_movies("").await.len(), 2);
    }

    #[tokio::test]
    async fn test_remote_results_are_returned() {
        let (remote, seen) = ScriptedRemote::boxed(one_remote_hit);
        let gateway = SearchGateway::with_remote(remote, FallbackCatalog::curated());

        let results = gateway.search_movies("  heat ").await;
        assert_eq!(results, vec![MovieRecord::new("remote-1", "Heat")]);
        assert_eq!(*seen.lock().unwrap(), vec!["heat".to_string()]);
    }

    #[tokio::test]
    async fn test_network_failure_degrades_to_fallback() {
        let (remote, seen) = ScriptedRemote::boxed(network_down);
        let gateway = SearchGateway::with_remote(remote, FallbackCatalog::curated());

        let results = gateway.search_movies("godfather").await;
        assert_eq!(results, FallbackCatalog::curated().lookup("godfather"));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_parse_failure_degrades_to_fallback() {
        let (remote, _) = ScriptedRemote::boxed(garbled);
        let gateway = SearchGateway::with_remote(remote, FallbackCatalog::curated());

        let results = gateway.search_movies("").await;
        assert_eq!(results.len(), 8);
    }

    #[tokio::test]
    async fn test_gateway_as_provider_never_errors() {
        let (remote, _) = ScriptedRemote::boxed(network_down);
        let gateway = SearchGateway::with_remote(remote, FallbackCatalog::curated());
        let provider: &dyn MovieSearchProvider = &gateway;

        let results = provider.search_movies("matrix").await.unwrap();
        assert_eq!(results[0].id, "tt0133093");
    }
}
