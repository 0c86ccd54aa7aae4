//! Channel-backed feed of change events
//!
//! Provides various iteration patterns for consuming change events:
//! - Non-blocking: `try_recv()`, `try_iter()`
//! - Timeout: `recv_timeout()`, `timeout_iter()`
//! - Blocking: `recv()`, `for event in iter`
//!
//! Each iterator owns a wildcard listener on the store that forwards every
//! change into its channel. Dropping the iterator removes that listener.
//! The iterator does not keep the store alive: once every store handle is
//! dropped the channel closes and blocking receives return `None`.

use std::sync::{mpsc, Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::event::ChangeEvent;
use crate::listener::{ListenerRegistry, Subscription};

/// Iterator over property change events
///
/// Events are delivered in the order the store applied the changes. Since
/// notification is synchronous, the events for a write are already queued
/// when the write returns.
///
/// # Example
///
/// ```rust,ignore
/// let changes = store.changes();
/// store.set_property("volume", 60)?;
///
/// // Drain whatever is queued
/// for event in changes.try_iter() {
///     println!("{} changed to {}", event.key, event.new_value);
/// }
///
/// // Wait for a change made elsewhere
/// if let Some(event) = changes.recv_timeout(Duration::from_secs(1)) {
///     println!("Got event: {:?}", event);
/// }
/// ```
pub struct ChangeIterator {
    rx: mpsc::Receiver<ChangeEvent>,
    registry: Weak<Mutex<ListenerRegistry>>,
    subscription: Subscription,
}

impl ChangeIterator {
    /// Register a forwarding listener on `registry` and wrap its channel
    pub(crate) fn attach(registry: &Arc<Mutex<ListenerRegistry>>) -> Self {
        let (tx, rx) = mpsc::channel();

        let subscription = registry.lock().add_any(move |key, old_value, new_value| {
            let event = ChangeEvent::new(key, old_value.cloned(), new_value.clone());
            let _ = tx.send(event);
        });

        Self {
            rx,
            registry: Arc::downgrade(registry),
            subscription,
        }
    }

    /// The wildcard registration feeding this iterator
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Block until the next event is available
    ///
    /// Returns `None` once the store has been dropped.
    pub fn recv(&self) -> Option<ChangeEvent> {
        self.rx.recv().ok()
    }

    /// Block until the next event or timeout expires
    ///
    /// Returns `None` if the timeout expires or the store has been dropped.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ChangeEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Try to receive an event without blocking
    ///
    /// Returns `None` if no event is currently available.
    pub fn try_recv(&self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }

    /// Get a non-blocking iterator over currently available events
    pub fn try_iter(&self) -> TryIter<'_> {
        TryIter { inner: self }
    }

    /// Get a blocking iterator with timeout
    ///
    /// Blocks for up to `timeout` on each call to `next()` and stops when the
    /// timeout expires without events.
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIter<'_> {
        TimeoutIter {
            inner: self,
            timeout,
        }
    }
}

impl Iterator for ChangeIterator {
    type Item = ChangeEvent;

    /// Block until the next change event
    ///
    /// Ends when the last handle to the store is dropped.
    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl Drop for ChangeIterator {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(&self.subscription);
        }
    }
}

impl std::fmt::Debug for ChangeIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeIterator")
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

/// Non-blocking iterator over currently available events
pub struct TryIter<'a> {
    inner: &'a ChangeIterator,
}

impl Iterator for TryIter<'_> {
    type Item = ChangeEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with timeout
pub struct TimeoutIter<'a> {
    inner: &'a ChangeIterator,
    timeout: Duration,
}

impl Iterator for TimeoutIter<'_> {
    type Item = ChangeEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}
