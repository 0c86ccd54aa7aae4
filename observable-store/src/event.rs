//! Owned change events for the change feed
//!
//! Callback listeners borrow the old and new values for the duration of the
//! call. A `ChangeEvent` carries its own copies instead, so it can be queued
//! and consumed later through [`ChangeIterator`](crate::ChangeIterator).

use std::time::Instant;

use serde_json::Value;

/// A property change captured by the change feed
///
/// # Example
///
/// ```rust
/// use observable_store::ObservableStore;
/// use serde_json::json;
///
/// let store = ObservableStore::new();
/// let changes = store.changes();
///
/// store.set_property("volume", 50).unwrap();
///
/// let event = changes.try_recv().unwrap();
/// assert_eq!(event.key, "volume");
/// assert_eq!(event.old_value, None);
/// assert_eq!(event.new_value, json!(50));
/// ```
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// The property that changed
    pub key: String,

    /// Value before the write, `None` if the property was absent
    pub old_value: Option<Value>,

    /// Value after the write
    pub new_value: Value,

    /// When the change was applied
    pub timestamp: Instant,
}

impl ChangeEvent {
    /// Create a new change event stamped with the current time
    pub fn new(key: impl Into<String>, old_value: Option<Value>, new_value: Value) -> Self {
        Self::with_timestamp(key, old_value, new_value, Instant::now())
    }

    /// Create a new change event with a specific timestamp
    pub fn with_timestamp(
        key: impl Into<String>,
        old_value: Option<Value>,
        new_value: Value,
        timestamp: Instant,
    ) -> Self {
        Self {
            key: key.into(),
            old_value,
            new_value,
            timestamp,
        }
    }

    /// Whether the property did not exist before this change
    pub fn is_insert(&self) -> bool {
        self.old_value.is_none()
    }
}

impl PartialEq for ChangeEvent {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp not included in equality
        self.key == other.key
            && self.old_value == other.old_value
            && self.new_value == other.new_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_event_creation() {
        let event = ChangeEvent::new("temperature", Some(json!(20)), json!(21));

        assert_eq!(event.key, "temperature");
        assert_eq!(event.old_value, Some(json!(20)));
        assert_eq!(event.new_value, json!(21));
        assert!(!event.is_insert());
    }

    #[test]
    fn test_change_event_equality_ignores_timestamp() {
        let event1 = ChangeEvent::new("temperature", None, json!(21));
        let event2 = ChangeEvent::with_timestamp(
            "temperature",
            None,
            json!(21),
            Instant::now() + std::time::Duration::from_secs(5),
        );
        let event3 = ChangeEvent::new("humidity", None, json!(21));
        let event4 = ChangeEvent::new("temperature", Some(json!(20)), json!(21));

        assert_eq!(event1, event2);
        assert_ne!(event1, event3);
        assert_ne!(event1, event4);
        assert!(event1.is_insert());
    }
}
