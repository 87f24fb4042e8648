//! Centralized configuration for Cinescope.
//!
//! Configuration is read once at startup into an immutable [`CinescopeConfig`] that is
//! handed to the search gateway. Nothing downstream reads process state at call time.

use std::time::Duration;

use serde::Deserialize;

use crate::CinescopeError;
use crate::tracing_setup::LogLevel;

/// Environment variable holding the remote search endpoint base URL.
pub const API_BASE_VAR: &str = "API_BASE";
/// Environment variable selecting console verbosity.
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
/// Environment variable holding a JSON object of feature flags.
pub const FEATURE_FLAGS_VAR: &str = "FEATURE_FLAGS";
/// Override for the remote request timeout, in milliseconds.
pub const REQUEST_TIMEOUT_VAR: &str = "CINESCOPE_REQUEST_TIMEOUT_MS";
/// Override for the query debounce delay, in milliseconds.
pub const DEBOUNCE_VAR: &str = "CINESCOPE_DEBOUNCE_MS";

/// Central configuration for all Cinescope components.
#[derive(Debug, Clone, Default)]
pub struct CinescopeConfig {
    pub search: SearchConfig,
    pub feature_flags: FeatureFlags,
    pub log_level: LogLevel,
    /// Problems found while loading. Logged once tracing is initialized.
    pub warnings: Vec<String>,
}

/// Search gateway and input pipeline configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Remote endpoint base. `None` means every search uses the fallback catalog.
    pub api_base: Option<String>,
    /// Hard timeout for one remote search request
    pub request_timeout: Duration,
    /// Quiet period before a query value is dispatched
    pub debounce_delay: Duration,
    /// Number of fallback records returned for an empty query
    pub fallback_limit: usize,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            request_timeout: Duration::from_millis(8000),
            debounce_delay: Duration::from_millis(400),
            fallback_limit: 8,
            user_agent: "cinescope/0.1.0",
        }
    }
}

impl SearchConfig {
    /// Configuration pointing at a remote endpoint, with defaults elsewhere.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: Some(api_base.into()),
            ..Self::default()
        }
    }
}

/// Feature toggles supplied as a JSON object.
///
/// Unknown keys are ignored; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    /// Whether selecting a result opens its details view
    pub enable_details_modal: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_details_modal: true,
        }
    }
}

impl FeatureFlags {
    /// Parses a JSON object of flags, merging over the defaults.
    ///
    /// An empty string yields the defaults.
    ///
    /// # Errors
    /// - `serde_json::Error` - Input is not a JSON object of known flag types
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw)
    }
}

impl CinescopeConfig {
    /// Creates configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration reading each variable through `lookup`.
    ///
    /// Malformed values fall back to defaults and are reported in `warnings`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup(API_BASE_VAR) {
            config.set_api_base(&base);
        }

        if let Some(level) = lookup(LOG_LEVEL_VAR).filter(|l| !l.trim().is_empty()) {
            match level.parse::<LogLevel>() {
                Ok(level) => config.log_level = level,
                Err(e) => config.warnings.push(format!("{e}, using {}", LogLevel::default())),
            }
        }

        if let Some(raw) = lookup(FEATURE_FLAGS_VAR) {
            match FeatureFlags::parse(&raw) {
                Ok(flags) => config.feature_flags = flags,
                Err(e) => config
                    .warnings
                    .push(format!("Ignoring {FEATURE_FLAGS_VAR}: {e}")),
            }
        }

        if let Some(timeout) = config.millis_override(&lookup, REQUEST_TIMEOUT_VAR) {
            config.search.request_timeout = timeout;
        }

        if let Some(delay) = config.millis_override(&lookup, DEBOUNCE_VAR) {
            config.search.debounce_delay = delay;
        }

        config
    }

    /// Replaces the remote endpoint.
    ///
    /// Blank input clears it. A value that is not an absolute URL also clears it
    /// and records a warning.
    pub fn set_api_base(&mut self, raw: &str) {
        let base = raw.trim();
        if base.is_empty() {
            self.search.api_base = None;
            return;
        }

        match url::Url::parse(base) {
            Ok(_) => self.search.api_base = Some(base.to_string()),
            Err(e) => {
                self.warnings.push(format!(
                    "Ignoring {API_BASE_VAR} '{base}': {e}, searching the local catalog only"
                ));
                self.search.api_base = None;
            }
        }
    }

    /// Whether searches will attempt the remote endpoint.
    pub fn has_remote(&self) -> bool {
        self.search.api_base.is_some()
    }

    /// Replaces the remote endpoint with an explicitly requested one.
    ///
    /// Unlike [`CinescopeConfig::set_api_base`], an invalid value is rejected
    /// instead of silently disabling the remote catalog.
    ///
    /// # Errors
    ///
    /// - `CinescopeError::Configuration` - `raw` is not blank and not an absolute URL
    pub fn override_api_base(&mut self, raw: &str) -> crate::Result<()> {
        let base = raw.trim();
        if !base.is_empty() {
            url::Url::parse(base).map_err(|e| CinescopeError::Configuration {
                reason: format!("API base '{base}' is not a valid URL: {e}"),
            })?;
        }
        self.set_api_base(base);
        Ok(())
    }

    fn millis_override<F>(&mut self, lookup: &F, key: &str) -> Option<Duration>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(key)?;
        match raw.trim().parse::<u64>() {
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(_) => {
                self.warnings
                    .push(format!("Ignoring {key}='{raw}': expected milliseconds"));
                None
            }
        }
    }
}
