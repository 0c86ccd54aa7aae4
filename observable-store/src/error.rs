//! Error types for observable-store

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading or writing the store
///
/// Every fallible step runs before the state is touched, so an error never
/// leaves a half-applied write behind.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A value could not be converted into a state value
    #[error("Value is not representable as a state value: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A stored value could not be read back as the requested type
    #[error("Property \"{key}\" could not be deserialized: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A bulk update was given something other than an object
    #[error("Bulk state update requires an object, got {0}")]
    NotAnObject(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::NotAnObject("array");
        assert_eq!(err.to_string(), "Bulk state update requires an object, got array");
    }

    #[test]
    fn test_deserialize_error_has_source() {
        let source = serde_json::from_str::<u8>("\"nope\"").unwrap_err();
        let err = StoreError::Deserialize {
            key: "volume".to_string(),
            source,
        };

        assert!(err.to_string().starts_with("Property \"volume\""));
        assert!(std::error::Error::source(&err).is_some());
    }
}
