//! Structured logging setup on top of `tracing`.
//!
//! Token and credential values are never logged: the auth types redact
//! themselves in their `Debug` implementations, and call sites log only
//! non-sensitive fields (usernames, status codes, flags).
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Pretty)
//!     .with_level(LogLevel::Debug);
//!
//! init_logging(config).expect("Failed to initialize logging");
//! ```

use crate::error::{Error, Result};
use std::io;
use tracing_subscriber::{
    filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Log output format. Defaults to `Pretty` in debug builds and `Json` in
/// release builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
    /// Single-line output for production logs that stay human-readable
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Minimum level applied to the workspace crates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration, built fluently.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Overrides `level` entirely when set, in env-filter syntax
    /// (e.g. `"core_auth=debug,bridge_desktop=trace"`).
    pub filter: Option<String>,
    /// Include the emitting module path in each line
    pub display_target: bool,
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }
}

/// Initializes the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns `Error::Config` when a subscriber is already installed or the
/// filter string is invalid.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;

    let fmt = tracing_subscriber::fmt::layer()
        .with_target(config.display_target)
        .with_writer(io::stdout);
    let fmt = match config.format {
        LogFormat::Pretty => fmt.pretty().boxed(),
        LogFormat::Json => fmt.json().boxed(),
        LogFormat::Compact => fmt.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let filter_string = match &config.filter {
        Some(custom) => custom.clone(),
        None => {
            // Workspace crates at the configured level, noisy HTTP internals at warn
            let level = config.level.as_str();
            format!(
                "core_runtime={level},core_auth={level},bridge_traits={level},\
                 bridge_desktop={level},h2=warn,hyper=warn,reqwest=warn",
            )
        }
    };

    EnvFilter::try_new(filter_string)
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_covers_workspace_crates() {
        let config = LoggingConfig::default().with_level(LogLevel::Debug);
        let filter = build_filter(&config).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("core_auth=debug"));
        assert!(rendered.contains("hyper=warn"));
    }

    #[test]
    fn custom_filter_is_used_verbatim() {
        let config = LoggingConfig::default().with_filter("core_auth=trace");
        let filter = build_filter(&config).unwrap();
        assert_eq!(filter.to_string(), "core_auth=trace");
    }

    #[test]
    fn invalid_filter_is_rejected() {
        let config = LoggingConfig::default().with_filter("=]=[invalid");
        assert!(build_filter(&config).is_err());
    }
}
