//! Read-only copies of the store's state

use std::ops::Deref;

use serde::Serialize;
use serde_json::{Map, Value};

/// The state held by a store: property name to value
pub type State = Map<String, Value>;

/// A point-in-time, read-only copy of a store's state
///
/// A snapshot shares nothing with the store that produced it. It exposes
/// the state through shared references only; [`Snapshot::into_inner`]
/// hands out an owned map for callers that want to edit their copy, which
/// still has no effect on the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    state: State,
}

impl Snapshot {
    pub(crate) fn new(state: State) -> Self {
        Self { state }
    }

    /// Get a property value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    /// Check if a property exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.state.contains_key(key)
    }

    /// Number of properties in the snapshot
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Check if the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Iterate over properties
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.state.iter()
    }

    /// Iterate over property names
    pub fn keys(&self) -> serde_json::map::Keys<'_> {
        self.state.keys()
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &State {
        &self.state
    }

    /// Take ownership of the copied map
    pub fn into_inner(self) -> State {
        self.state
    }
}

impl Deref for Snapshot {
    type Target = State;

    fn deref(&self) -> &State {
        &self.state
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.state.iter()
    }
}

impl From<Snapshot> for Value {
    fn from(snapshot: Snapshot) -> Self {
        Value::Object(snapshot.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Snapshot {
        let mut state = State::new();
        state.insert("volume".to_string(), json!(50));
        state.insert("tags".to_string(), json!(["a", "b"]));
        Snapshot::new(state)
    }

    #[test]
    fn test_read_access() {
        let snapshot = sample();

        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.is_empty());
        assert!(snapshot.contains_key("volume"));
        assert_eq!(snapshot.get("volume"), Some(&json!(50)));
        assert_eq!(snapshot.get("missing"), None);
        assert_eq!(snapshot.keys().count(), 2);
        assert_eq!((&snapshot).into_iter().count(), 2);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let text = serde_json::to_string(&sample()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, json!({"volume": 50, "tags": ["a", "b"]}));
        assert_eq!(Value::from(sample()), value);
    }

    #[test]
    fn test_into_inner_is_independent_copy() {
        let snapshot = sample();
        let mut owned = snapshot.clone().into_inner();
        owned.insert("volume".to_string(), json!(0));

        assert_eq!(snapshot.get("volume"), Some(&json!(50)));
    }
}
