//! Ordered listener registries
//!
//! The store keeps two registries:
//! - key listeners, grouped by property key, called with `(old, new)`
//! - wildcard listeners, called with `(key, old, new)` for every change
//!
//! Registration order is preserved within each registry. Every registration
//! returns a [`Subscription`] that can later be passed to
//! [`ObservableStore::unsubscribe`](crate::ObservableStore::unsubscribe).
//!
//! A change is delivered in two phases: wildcard listeners first, then the
//! listeners for the changed key. Each phase copies its listener list while
//! the registry lock is held and releases the lock before calling anything,
//! so listeners may freely call back into the store. The key list is copied
//! only after every wildcard listener has returned.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Listener for a single property, called with `(old_value, new_value)`
///
/// `old_value` is `None` when the property was absent before the write.
pub type KeyListener = Arc<dyn Fn(Option<&Value>, &Value) + Send + Sync>;

/// Listener for every property, called with `(key, old_value, new_value)`
pub type AnyListener = Arc<dyn Fn(&str, Option<&Value>, &Value) + Send + Sync>;

/// Identifier assigned to each registration, unique per store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// What a registration listens to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// A single property key
    Key(String),
    /// Every property
    Any,
}

/// Handle for one listener registration
///
/// Dropping a `Subscription` does not remove the listener; pass it to
/// `unsubscribe` for that.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: ListenerId,
    target: ListenerTarget,
}

impl Subscription {
    /// The registration's identifier
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// The key or wildcard this registration listens to
    pub fn target(&self) -> &ListenerTarget {
        &self.target
    }
}

/// Both listener registries of a store
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    by_key: HashMap<String, Vec<(ListenerId, KeyListener)>>,
    any: Vec<(ListenerId, AnyListener)>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a listener for `key`
    pub(crate) fn add_key<F>(&mut self, key: String, listener: F) -> Subscription
    where
        F: Fn(Option<&Value>, &Value) + Send + Sync + 'static,
    {
        let id = self.allocate_id();
        self.by_key
            .entry(key.clone())
            .or_default()
            .push((id, Arc::new(listener)));

        Subscription {
            id,
            target: ListenerTarget::Key(key),
        }
    }

    /// Append a wildcard listener
    pub(crate) fn add_any<F>(&mut self, listener: F) -> Subscription
    where
        F: Fn(&str, Option<&Value>, &Value) + Send + Sync + 'static,
    {
        let id = self.allocate_id();
        self.any.push((id, Arc::new(listener)));

        Subscription {
            id,
            target: ListenerTarget::Any,
        }
    }

    /// Remove a registration, returning whether it was present
    pub(crate) fn remove(&mut self, subscription: &Subscription) -> bool {
        match &subscription.target {
            ListenerTarget::Any => remove_by_id(&mut self.any, subscription.id),
            ListenerTarget::Key(key) => {
                let Some(listeners) = self.by_key.get_mut(key) else {
                    return false;
                };
                let removed = remove_by_id(listeners, subscription.id);
                if listeners.is_empty() {
                    self.by_key.remove(key);
                }
                removed
            }
        }
    }

    /// Copy out the wildcard listeners
    pub(crate) fn wildcards(&self) -> Vec<AnyListener> {
        self.any.iter().map(|(_, l)| Arc::clone(l)).collect()
    }

    /// Copy out the listeners registered for `key`
    pub(crate) fn keyed(&self, key: &str) -> Vec<KeyListener> {
        self.by_key
            .get(key)
            .map(|listeners| listeners.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default()
    }

    /// Total number of registrations
    pub(crate) fn len(&self) -> usize {
        self.any.len() + self.by_key.values().map(Vec::len).sum::<usize>()
    }

    /// Number of listeners registered for `key` (wildcards not included)
    pub(crate) fn key_len(&self, key: &str) -> usize {
        self.by_key.get(key).map_or(0, Vec::len)
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("keys", &self.by_key.len())
            .field("any", &self.any.len())
            .finish()
    }
}

fn remove_by_id<L>(listeners: &mut Vec<(ListenerId, L)>, id: ListenerId) -> bool {
    let before = listeners.len();
    listeners.retain(|(existing, _)| *existing != id);
    listeners.len() != before
}
