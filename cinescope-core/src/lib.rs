//! Cinescope Core - Configuration, logging and shared errors
//!
//! Holds the pieces every Cinescope crate agrees on: the immutable startup
//! configuration, tracing setup, and the top-level error type.

pub mod config;
pub mod tracing_setup;

pub use config::{CinescopeConfig, FeatureFlags, SearchConfig};
pub use tracing_setup::LogLevel;

/// Errors that can bubble up to the Cinescope binary.
#[derive(Debug, thiserror::Error)]
pub enum CinescopeError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tracing setup failed: {reason}")]
    Tracing { reason: String },
}

impl CinescopeError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            CinescopeError::Configuration { reason } => format!("Invalid configuration: {reason}"),
            CinescopeError::Io(_) => "File system error occurred".to_string(),
            CinescopeError::Tracing { .. } => "Could not start logging".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CinescopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_io_details() {
        let err = CinescopeError::Io(std::io::Error::other("disk on fire"));
        assert_eq!(err.user_message(), "File system error occurred");

        let err = CinescopeError::Configuration {
            reason: "bad flag".to_string(),
        };
        assert_eq!(err.user_message(), "Invalid configuration: bad flag");
    }
}
