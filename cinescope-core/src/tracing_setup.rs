//! Tracing setup for Cinescope
//!
//! Console output follows the configured log level. An optional log file captures
//! debug output with source locations for troubleshooting remote search failures.

use std::fs::{File, create_dir_all};
use std::path::Path;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::CinescopeError;

/// Initialize tracing with console output and an optional debug log file.
///
/// `RUST_LOG` takes precedence over `console_level` for the console layer.
///
/// # Errors
///
/// - `CinescopeError::Io` - Log file or its parent directory cannot be created
/// - `CinescopeError::Tracing` - A global subscriber is already installed
pub fn init_tracing(console_level: LogLevel, log_file: Option<&Path>) -> crate::Result<()> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.as_tracing_level().to_string()));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                create_dir_all(parent)?;
            }
            let file = File::create(path)?;
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_writer(file)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CinescopeError::Tracing {
            reason: e.to_string(),
        })?;

    tracing::debug!(
        "Tracing initialized: console={}, log_file={}",
        console_level,
        log_file.map_or_else(|| "none".to_string(), |p| p.display().to_string())
    );

    Ok(())
}

/// Log verbosity accepted from `LOG_LEVEL` and `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogLevel {
    /// Debug, informational, warning, and error messages
    Debug,
    /// Warning and error messages
    #[default]
    Warn,
}

impl LogLevel {
    /// Converts the log level to the tracing `Level` used for filtering.
    ///
    /// # Examples
    /// ```
    /// use cinescope_core::tracing_setup::LogLevel;
    ///
    /// assert_eq!(LogLevel::Warn.as_tracing_level(), tracing::Level::WARN);
    /// ```
    pub fn as_tracing_level(self) -> Level {
        match self {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Warn => Level::WARN,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "warn" => Ok(LogLevel::Warn),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Warn => write!(f, "warn"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!(" WARN ".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("trace".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::default(), LogLevel::Warn);
    }

    #[test]
    fn test_init_creates_log_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("logs").join("cinescope.log");

        init_tracing(LogLevel::Warn, Some(&log_file)).unwrap();
        tracing::debug!("written to the log file only");
        assert!(log_file.exists());

        let second = init_tracing(LogLevel::Debug, None);
        assert!(matches!(second, Err(CinescopeError::Tracing { .. })));
    }

    #[test]
    fn test_log_level_display_round_trips() {
        for level in [LogLevel::Debug, LogLevel::Warn] {
            assert_eq!(level.to_string().parse::<LogLevel>(), Ok(level));
        }
    }
}
