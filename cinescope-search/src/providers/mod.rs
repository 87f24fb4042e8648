//! Provider implementations for movie search.

use async_trait::async_trait;

use crate::errors::MovieSearchError;
use crate::types::MovieRecord;

pub mod fallback;
pub mod remote;

pub use fallback::FallbackCatalog;
pub use remote::RemoteCatalogProvider;

/// Trait for movie search providers.
///
/// Implementations include the remote catalog, the local fallback catalog, and the
/// search gateway that combines them. The orchestrator only sees this trait.
#[async_trait]
pub trait MovieSearchProvider: Send + Sync + std::fmt::Debug {
    /// Search for movies matching a free-text query.
    ///
    /// # Errors
    /// - `MovieSearchError::NetworkFailure` - Transport error, bad status, or timeout
    /// - `MovieSearchError::ParseFailure` - Response body could not be interpreted
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieRecord>, MovieSearchError>;
}
