//! Error types for movie search functionality.

use thiserror::Error;

/// Errors that can occur while searching for movies.
///
/// The search gateway absorbs every variant by degrading to the fallback catalog.
/// Only the orchestrator surfaces `DispatchFailed` to the view.
#[derive(Debug, Error)]
pub enum MovieSearchError {
    /// Connection error, non-success status, or request timeout.
    #[error("Network error: {reason}")]
    NetworkFailure {
        /// The reason for the network failure
        reason: String,
    },

    /// Response body was not the expected JSON shape.
    #[error("Parse error: {reason}")]
    ParseFailure {
        /// The reason for the parse failure
        reason: String,
    },

    /// The search task itself failed before producing a result.
    #[error("Search dispatch failed for query '{query}': {reason}")]
    DispatchFailed {
        /// The query whose search task failed
        query: String,
        /// The reason for the failure
        reason: String,
    },
}

impl MovieSearchError {
    /// Whether this error came from the transport rather than the payload.
    pub fn is_network(&self) -> bool {
        matches!(self, MovieSearchError::NetworkFailure { .. })
    }
}
