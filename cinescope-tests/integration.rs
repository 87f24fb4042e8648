//! Integration tests for Cinescope
//!
//! These tests run the search stack against a local HTTP catalog and check how the
//! gateway, orchestrator and debouncer behave together over a real socket.

#[path = "integration/mock_catalog.rs"]
mod mock_catalog;

#[path = "integration/remote_contract.rs"]
mod remote_contract;

#[path = "integration/fallback_degradation.rs"]
mod fallback_degradation;

#[path = "integration/search_pipeline.rs"]
mod search_pipeline;
