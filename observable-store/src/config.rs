//! Store configuration
//!
//! A `StoreConfig` is fixed when the store is built. The only recognised
//! option is `debug`, which makes listener registration log a line naming
//! the property being observed.

use serde::{Deserialize, Serialize};

/// Environment variable read by [`StoreConfig::from_env`]
pub const DEBUG_ENV_VAR: &str = "OBSERVABLE_STORE_DEBUG";

/// Immutable configuration for an [`ObservableStore`](crate::ObservableStore)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Log a diagnostic line for every listener registration
    pub debug: bool,
}

impl StoreConfig {
    /// Create a configuration with all options disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the debug flag
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Build a configuration from `OBSERVABLE_STORE_DEBUG`
    ///
    /// `1`, `true`, `yes` and `on` (any case) enable debug logging. A missing
    /// or unrecognised value leaves it disabled.
    pub fn from_env() -> Self {
        let debug = std::env::var(DEBUG_ENV_VAR)
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Self { debug }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_not_debug() {
        assert!(!StoreConfig::default().debug);
        assert_eq!(StoreConfig::new(), StoreConfig::default());
    }

    #[test]
    fn test_with_debug() {
        assert!(StoreConfig::new().with_debug(true).debug);
    }

    #[test]
    fn test_parse_flag() {
        for on in ["1", "true", "TRUE", " yes ", "On"] {
            assert!(parse_flag(on), "{on:?} should enable");
        }
        for off in ["", "0", "false", "no", "enabled"] {
            assert!(!parse_flag(off), "{off:?} should not enable");
        }
    }

    #[test]
    fn test_deserialize_missing_fields_use_defaults() {
        let config: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());

        let config: StoreConfig = serde_json::from_str(r#"{"debug": true}"#).unwrap();
        assert!(config.debug);
    }
}
