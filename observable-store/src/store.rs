//! Observable key-value store
//!
//! `ObservableStore` maps property names to JSON-like values and notifies
//! listeners whenever a write actually changes a value. Redundant writes,
//! where the new value is structurally equal to the stored one, are silent
//! no-ops.
//!
//! # Architecture
//!
//! ```text
//! ObservableStore
//! ├── state: Arc<RwLock<Map<String, Value>>>
//! ├── listeners: Arc<Mutex<ListenerRegistry>>
//! │   ├── by_key: HashMap<String, Vec<KeyListener>>
//! │   └── any: Vec<AnyListener>
//! └── config: StoreConfig
//! ```
//!
//! # Write path
//!
//! ```text
//! set_property(key, value)
//!   ├── equal to current? ── yes ──> return Ok(false)
//!   └── no
//!       ├── swap the new value in, keep the old one
//!       ├── release the state lock
//!       ├── wildcard listeners (key, old, new)
//!       └── key listeners (old, new)
//! ```

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, trace};

use crate::config::StoreConfig;
use crate::equality::deep_equal;
use crate::error::{Result, StoreError};
use crate::iter::ChangeIterator;
use crate::listener::{ListenerRegistry, Subscription};
use crate::snapshot::{Snapshot, State};

/// Key-value store that broadcasts actual changes to its listeners
///
/// Cloning the store creates another handle to the same state and
/// listeners.
///
/// # Listeners
///
/// Listeners run synchronously on the thread performing the write, after the
/// new value is in place. No internal lock is held while they run, so a
/// listener may read the store, write to it, or register and remove
/// listeners. Writes made from a listener are applied and broadcast before
/// the outer write returns. The store does not detect cycles where
/// listeners keep re-triggering each other.
///
/// Each individual read or write is internally synchronized, but a write
/// and its broadcast are not atomic with respect to other threads. Callers
/// sharing a store across threads must order their writes themselves.
///
/// # Example
///
/// ```rust
/// use observable_store::ObservableStore;
/// use serde_json::json;
///
/// let store = ObservableStore::new();
///
/// store.on_changed("volume", |old, new| {
///     println!("volume: {:?} -> {}", old, new);
/// });
///
/// assert!(store.set_property("volume", 50).unwrap());
/// // Same value again: no change, no notification
/// assert!(!store.set_property("volume", 50).unwrap());
///
/// assert_eq!(store.get_state().get("volume"), Some(&json!(50)));
/// ```
pub struct ObservableStore {
    state: Arc<RwLock<State>>,
    listeners: Arc<Mutex<ListenerRegistry>>,
    config: StoreConfig,
}

impl ObservableStore {
    /// Create an empty store with the default configuration
    pub fn new() -> Self {
        Self::with_config(State::new(), StoreConfig::default())
    }

    /// Create a store holding `initial` with the default configuration
    pub fn with_state(initial: State) -> Self {
        Self::with_config(initial, StoreConfig::default())
    }

    /// Create a store holding `initial` with the given configuration
    ///
    /// The store takes ownership of the map; nothing outside the store can
    /// reach it afterwards.
    pub fn with_config(initial: State, config: StoreConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
            listeners: Arc::new(Mutex::new(ListenerRegistry::new())),
            config,
        }
    }

    /// The configuration the store was built with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Take a deep, read-only snapshot of the whole state
    pub fn get_state(&self) -> Snapshot {
        Snapshot::new(self.state.read().clone())
    }

    /// Get a copy of a single property value
    pub fn get_property(&self, key: &str) -> Option<Value> {
        self.state.read().get(key).cloned()
    }

    /// Get a property value deserialized into `T`
    ///
    /// Returns `Ok(None)` if the property is absent.
    pub fn get_property_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.get_property(key) else {
            return Ok(None);
        };

        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Deserialize {
                key: key.to_string(),
                source,
            })
    }

    /// Check if a property exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.state.read().contains_key(key)
    }

    /// Get all property names
    pub fn keys(&self) -> Vec<String> {
        self.state.read().keys().cloned().collect()
    }

    /// Get the number of properties in the store
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.state.read().is_empty()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Set a property, broadcasting the change if the value differs
    ///
    /// The value is converted into a state value first; if that fails the
    /// store is left untouched and the error is returned. Returns whether the
    /// stored value changed.
    pub fn set_property<V: Serialize>(&self, key: impl Into<String>, value: V) -> Result<bool> {
        let new_value = serde_json::to_value(value)?;
        Ok(self.apply(key.into(), new_value))
    }

    /// Apply every entry of `partial` as an individual property write
    ///
    /// Entries are applied in the map's iteration order. Each changed entry is
    /// broadcast before the next one is applied; there is no combined
    /// notification. Returns the number of properties that changed.
    pub fn set_state(&self, partial: State) -> usize {
        let mut changed = 0;
        for (key, value) in partial {
            if self.apply(key, value) {
                changed += 1;
            }
        }
        changed
    }

    /// Serialize `value` into an object and apply it with [`set_state`](Self::set_state)
    pub fn set_state_from<T: Serialize>(&self, value: T) -> Result<usize> {
        match serde_json::to_value(value)? {
            Value::Object(partial) => Ok(self.set_state(partial)),
            other => Err(StoreError::NotAnObject(value_kind(&other))),
        }
    }

    /// Remove every property without notifying anyone
    pub fn clear_state(&self) {
        let removed = {
            let mut state = self.state.write();
            let removed = state.len();
            state.clear();
            removed
        };

        debug!(removed, "Cleared state");
    }

    /// Store `new_value` under `key` and broadcast if it changed anything
    fn apply(&self, key: String, new_value: Value) -> bool {
        let old_value = {
            let mut state = self.state.write();
            if deep_equal(state.get(&key), &new_value) {
                trace!(property = %key, "Value unchanged, skipping");
                return false;
            }
            state.insert(key.clone(), new_value.clone())
        };

        trace!(
            property = %key,
            inserted = old_value.is_none(),
            "Property changed"
        );

        self.emit_change(&key, old_value.as_ref(), &new_value);
        true
    }

    /// Notify wildcard listeners, then key listeners
    ///
    /// The key listener list is read after the wildcard phase, so changes a
    /// wildcard listener makes to the key's registrations apply to this
    /// change.
    fn emit_change(&self, key: &str, old_value: Option<&Value>, new_value: &Value) {
        let wildcards = self.listeners.lock().wildcards();
        for listener in &wildcards {
            listener(key, old_value, new_value);
        }

        let keyed = self.listeners.lock().keyed(key);
        for listener in &keyed {
            listener(old_value, new_value);
        }
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Listen for changes to one property
    ///
    /// `listener` receives `(old_value, new_value)`; `old_value` is `None`
    /// when the property did not exist before. Listeners for the same key
    /// run in registration order, after all wildcard listeners.
    pub fn on_changed<F>(&self, key: impl Into<String>, listener: F) -> Subscription
    where
        F: Fn(Option<&Value>, &Value) + Send + Sync + 'static,
    {
        let key = key.into();
        if self.config.debug {
            info!("Listening to \"{}\" property.", key);
        }
        self.listeners.lock().add_key(key, listener)
    }

    /// Listen for changes to any property
    ///
    /// `listener` receives `(key, old_value, new_value)` once for every
    /// property that changes.
    pub fn on_any_changed<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&str, Option<&Value>, &Value) + Send + Sync + 'static,
    {
        if self.config.debug {
            info!("Listening to any property.");
        }
        self.listeners.lock().add_any(listener)
    }

    /// Remove a listener, returning whether it was registered
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let removed = self.listeners.lock().remove(subscription);
        debug!(listener = %subscription.id(), removed, "Unsubscribed listener");
        removed
    }

    /// Receive owned change events through a channel
    ///
    /// The returned iterator is a wildcard listener; it is removed when the
    /// iterator is dropped.
    pub fn changes(&self) -> ChangeIterator {
        if self.config.debug {
            info!("Listening to any property.");
        }
        ChangeIterator::attach(&self.listeners)
    }

    /// Total number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Number of listeners registered for `key`, wildcards not included
    pub fn key_listener_count(&self, key: &str) -> usize {
        self.listeners.lock().key_len(key)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Default for ObservableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ObservableStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            listeners: Arc::clone(&self.listeners),
            config: self.config,
        }
    }
}

impl std::fmt::Debug for ObservableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableStore")
            .field("property_count", &self.len())
            .field("listener_count", &self.listener_count())
            .field("config", &self.config)
            .finish()
    }
}
