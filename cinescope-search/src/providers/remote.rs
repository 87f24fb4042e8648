//! Remote catalog provider speaking the `GET {base}/search?q=` contract.

use std::time::Duration;

use async_trait::async_trait;
use cinescope_core::SearchConfig;
use reqwest::header::ACCEPT;
use serde_json::Value;

use super::MovieSearchProvider;
use crate::errors::MovieSearchError;
use crate::normalizer::normalize_item;
use crate::types::MovieRecord;

/// Remote search provider backed by a JSON HTTP endpoint.
///
/// Each request races a hard timeout. When the timeout wins, the in-flight request
/// future is dropped, which aborts the underlying connection.
#[derive(Debug, Clone)]
pub struct RemoteCatalogProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RemoteCatalogProvider {
    /// Create provider for `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, timeout)
    }

    /// Create provider from search configuration, `None` if no endpoint is set.
    pub fn from_config(config: &SearchConfig) -> Option<Self> {
        let base_url = config.api_base.as_deref()?;
        let client = match reqwest::Client::builder()
            .user_agent(config.user_agent)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "HTTP client setup failed, using default client");
                reqwest::Client::new()
            }
        };

        Some(Self::with_client(client, base_url, config.request_timeout))
    }

    /// Create provider with a preconfigured HTTP client.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Builds the search URL for an already trimmed query.
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query)
        )
    }

    async fn fetch(&self, url: &str) -> Result<Vec<MovieRecord>, MovieSearchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| MovieSearchError::NetworkFailure {
                reason: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MovieSearchError::NetworkFailure {
                reason: format!("Search failed with status {status}"),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MovieSearchError::NetworkFailure {
                reason: format!("Reading response body failed: {e}"),
            })?;

        let data: Value =
            serde_json::from_slice(&body).map_err(|e| MovieSearchError::ParseFailure {
                reason: format!("JSON parsing failed: {e}"),
            })?;

        Ok(extract_items(data)?.iter().map(normalize_item).collect())
    }
}

#[async_trait]
impl MovieSearchProvider for RemoteCatalogProvider {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieRecord>, MovieSearchError> {
        let url = self.search_url(query.trim());
        tracing::debug!("Fetching: {url}");

        match tokio::time::timeout(self.timeout, self.fetch(&url)).await {
            Ok(result) => result,
            Err(_) => Err(MovieSearchError::NetworkFailure {
                reason: format!("Request aborted after {} ms", self.timeout.as_millis()),
            }),
        }
    }
}

/// Unwraps the item list from a bare array or a `{ "results": [...] }` object.
///
/// Objects without `results` and other scalar bodies yield no items.
///
/// # Errors
/// - `MovieSearchError::ParseFailure` - `results` is present but not an array
pub fn extract_items(data: Value) -> Result<Vec<Value>, MovieSearchError> {
    match data {
        Value::Array(items) => Ok(items),
        Value::Object(mut object) => match object.remove("results") {
            Some(Value::Array(items)) => Ok(items),
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(other) => Err(MovieSearchError::ParseFailure {
                reason: format!("Expected 'results' to be an array, found {other}"),
            }),
        },
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn provider(base: &str) -> RemoteCatalogProvider {
        RemoteCatalogProvider::new(base, Duration::from_millis(8000))
    }

    #[test]
    fn test_search_url_strips_trailing_slashes() {
        assert_eq!(
            provider("https://api.example.com/v1///").search_url("heat"),
            "https://api.example.com/v1/search?q=heat"
        );
    }

    #[test]
    fn test_search_url_encodes_query() {
        assert_eq!(
            provider("https://api.example.com").search_url("amélie & co/2"),
            "https://api.example.com/search?q=am%C3%A9lie%20%26%20co%2F2"
        );
        assert_eq!(
            provider("https://api.example.com").search_url(""),
            "https://api.example.com/search?q="
        );
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        assert!(RemoteCatalogProvider::from_config(&SearchConfig::default()).is_none());

        let config = SearchConfig::with_api_base("https://api.example.com/");
        let provider = RemoteCatalogProvider::from_config(&config).unwrap();
        assert_eq!(provider.timeout, Duration::from_millis(8000));
    }

    #[test]
    fn test_extract_items_shapes() {
        let bare = extract_items(json!([{ "id": "a" }, { "id": "b" }])).unwrap();
        assert_eq!(bare.len(), 2);

        let wrapped = extract_items(json!({ "results": [{ "id": "a" }], "total": 1 })).unwrap();
        assert_eq!(wrapped, vec![json!({ "id": "a" })]);

        assert!(extract_items(json!({ "total": 0 })).unwrap().is_empty());
        assert!(extract_items(json!("nothing")).unwrap().is_empty());
    }

    #[test]
    fn test_extract_items_rejects_non_array_results() {
        let err = extract_items(json!({ "results": { "id": "a" } })).unwrap_err();
        assert!(matches!(err, MovieSearchError::ParseFailure { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_failure() {
        // Nothing listens on the loopback discard port.
        let provider = RemoteCatalogProvider::new("http://127.0.0.1:9", Duration::from_secs(2));
        let err = provider.search_movies("heat").await.unwrap_err();
        assert!(err.is_network());
    }
}
