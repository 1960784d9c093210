//! Logging configuration
//!
//! The combinators only emit `tracing` events; nothing is printed until the
//! application installs a subscriber. [`init_logging`] installs one from a
//! [`LogConfig`] for binaries, examples and tests that do not bring their own.
//!
//! Event targets follow the module path (`nebula_outcome::deferred`,
//! `nebula_outcome::race`, ...), so a filter such as
//! `warn,nebula_outcome::deferred=debug` narrows output to task lifecycle.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(feature = "subscriber")]
use crate::error::Outcome;
use crate::error::OutcomeError;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "NEBULA_OUTCOME_LOG";

/// Environment variable holding the output format.
pub const LOG_FORMAT_ENV: &str = "NEBULA_OUTCOME_LOG_FORMAT";

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, multi-line
    Pretty,
    /// Compact single-line output
    #[default]
    Compact,
    /// Structured JSON output
    Json,
}

impl FromStr for LogFormat {
    type Err = OutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(OutcomeError::invalid_config(format!(
                "unknown log format `{other}`"
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive (e.g. "info", "warn,nebula_outcome::race=trace")
    pub level: String,

    /// Output format
    pub format: LogFormat,

    /// Include the event target
    pub with_target: bool,

    /// Include thread ids
    pub with_thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            with_target: true,
            with_thread_ids: false,
        }
    }
}

impl LogConfig {
    /// Defaults overridden by [`LOG_ENV`] and [`LOG_FORMAT_ENV`].
    ///
    /// An unrecognised format falls back to compact.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var(LOG_ENV).ok(),
            std::env::var(LOG_FORMAT_ENV).ok(),
        )
    }

    fn with_overrides(mut self, level: Option<String>, format: Option<String>) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(format) = format {
            self.format = format.parse().unwrap_or_default();
        }
        self
    }

    /// Development configuration (pretty, debug level, thread ids)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            with_thread_ids: true,
            ..Self::default()
        }
    }

    /// Test configuration (compact, trace level)
    #[must_use]
    pub fn test() -> Self {
        Self {
            level: "trace".to_string(),
            format: LogFormat::Compact,
            with_target: true,
            with_thread_ids: false,
        }
    }

    /// Checks that the filter directive parses.
    ///
    /// # Errors
    ///
    /// Returns [`OutcomeError::InvalidConfig`] for an unparsable filter.
    #[cfg(feature = "subscriber")]
    pub fn validate(&self) -> Outcome<()> {
        self.filter().map(|_| ())
    }

    #[cfg(feature = "subscriber")]
    fn filter(&self) -> Outcome<tracing_subscriber::EnvFilter> {
        tracing_subscriber::EnvFilter::try_new(&self.level).map_err(|e| {
            OutcomeError::invalid_config(format!("log filter `{}`: {e}", self.level))
        })
    }
}

/// Installs a global subscriber built from `config`.
///
/// Returns `Ok(true)` if this call installed it and `Ok(false)` if a global
/// subscriber was already set, in which case nothing changes.
///
/// # Errors
///
/// Returns [`OutcomeError::InvalidConfig`] for an unparsable filter.
#[cfg(feature = "subscriber")]
pub fn init_logging(config: &LogConfig) -> Outcome<bool> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = config.filter()?;
    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer()
        .with_target(config.with_target)
        .with_thread_ids(config.with_thread_ids);

    let installed = match config.format {
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };

    match installed {
        Ok(()) => {
            tracing::debug!(level = %config.level, format = ?config.format, "logging initialized");
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}
