//! Cinescope Search - Movie search and result normalization

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Searches a remote movie catalog, normalizes its loosely-shaped JSON into
//! canonical records, and degrades to a curated local catalog whenever the remote
//! source is not configured or not reachable. Debouncing and the search state
//! machine live here too so every front end shares the same ordering guarantees.

pub mod debounce;
pub mod errors;
pub mod gateway;
pub mod normalizer;
pub mod orchestrator;
pub mod providers;
pub mod session;
pub mod types;

// Re-export main types
pub use debounce::QueryDebouncer;
pub use errors::MovieSearchError;
pub use gateway::SearchGateway;
pub use normalizer::normalize_item;
pub use orchestrator::{SearchOrchestrator, SearchSnapshot, SearchState};
pub use providers::{FallbackCatalog, MovieSearchProvider, RemoteCatalogProvider};
pub use session::SearchSession;
pub use types::MovieRecord;

/// Convenience type alias for Results with MovieSearchError.
pub type Result<T> = std::result::Result<T, MovieSearchError>;
