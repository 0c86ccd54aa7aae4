//! Logging setup for applications embedding the store
//!
//! The store itself only emits `tracing` events. Applications that have no
//! subscriber of their own can install one here. Unless overridden from the
//! environment, the installed filter only admits events from this crate, so
//! the registration lines of a debug-enabled store are not drowned out by
//! other libraries.

use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::StoreConfig;

/// Environment variable selecting the logging mode
pub const LOG_MODE_ENV_VAR: &str = "OBSERVABLE_STORE_LOG_MODE";

/// Environment variable overriding the log filter
pub const LOG_LEVEL_ENV_VAR: &str = "OBSERVABLE_STORE_LOG_LEVEL";

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber is installed
    Silent,
    /// Compact stderr output of this crate's `info` events
    Development,
    /// Verbose output of this crate's `debug` events with source locations
    Debug,
}

impl LoggingMode {
    /// Mode matching a store configuration
    ///
    /// A debug-enabled store logs its registrations at `info`, which
    /// `Development` shows; otherwise nothing is installed.
    pub fn for_config(config: &StoreConfig) -> Self {
        if config.debug {
            LoggingMode::Development
        } else {
            LoggingMode::Silent
        }
    }

    /// Filter directive used when neither environment variable is set
    pub fn default_directive(self) -> &'static str {
        match self {
            LoggingMode::Silent => "off",
            LoggingMode::Development => "observable_store=info",
            LoggingMode::Debug => "observable_store=debug",
        }
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize logging with the specified mode
///
/// # Examples
///
/// ```rust,ignore
/// // Registration diagnostics from `StoreConfig { debug: true }` show up at info
/// observable_store::logging::init_logging(LoggingMode::Development)?;
///
/// // Also show every applied change
/// std::env::set_var("OBSERVABLE_STORE_LOG_LEVEL", "observable_store=trace");
/// observable_store::logging::init_logging(LoggingMode::Debug)?;
/// ```
///
/// # Environment Variables
///
/// - `OBSERVABLE_STORE_LOG_LEVEL`: filter directive (e.g. `trace`,
///   `observable_store=debug`)
/// - `RUST_LOG`: used when the above is not set
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter(mode.default_directive());

            Registry::default()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter(mode.default_directive());

            Registry::default()
                .with(
                    fmt::layer()
                        .pretty()
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Initialize logging from `OBSERVABLE_STORE_LOG_MODE`
///
/// - "development" -> LoggingMode::Development
/// - "debug" -> LoggingMode::Debug
///
/// Anything else, or no value, selects `LoggingMode::Silent`.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    init_logging(mode_from_str(std::env::var(LOG_MODE_ENV_VAR).ok().as_deref()))
}

fn mode_from_str(value: Option<&str>) -> LoggingMode {
    match value {
        Some("development") => LoggingMode::Development,
        Some("debug") => LoggingMode::Debug,
        _ => LoggingMode::Silent,
    }
}

/// Filter from `OBSERVABLE_STORE_LOG_LEVEL`, then `RUST_LOG`, then `default_level`
fn create_env_filter(default_level: &str) -> EnvFilter {
    if let Ok(level) = std::env::var(LOG_LEVEL_ENV_VAR) {
        EnvFilter::new(level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        EnvFilter::new(rust_log)
    } else {
        EnvFilter::new(default_level)
    }
}

/// Check if a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

/// Shorthand for `init_logging(LoggingMode::Silent)`
pub fn init_silent() -> Result<(), LoggingError> {
    init_logging(LoggingMode::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_mode() {
        assert!(init_logging(LoggingMode::Silent).is_ok());
        assert!(init_silent().is_ok());
    }

    #[test]
    fn test_mode_for_config() {
        assert_eq!(
            LoggingMode::for_config(&StoreConfig::new().with_debug(true)),
            LoggingMode::Development
        );
        assert_eq!(LoggingMode::for_config(&StoreConfig::default()), LoggingMode::Silent);
    }

    #[test]
    fn test_default_directive_targets_this_crate() {
        assert_eq!(LoggingMode::Silent.default_directive(), "off");
        assert_eq!(LoggingMode::Development.default_directive(), "observable_store=info");
        assert_eq!(LoggingMode::Debug.default_directive(), "observable_store=debug");
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(mode_from_str(Some("development")), LoggingMode::Development);
        assert_eq!(mode_from_str(Some("debug")), LoggingMode::Debug);
        assert_eq!(mode_from_str(Some("verbose")), LoggingMode::Silent);
        assert_eq!(mode_from_str(None), LoggingMode::Silent);
    }
}
