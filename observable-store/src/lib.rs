//! Observable Key-Value Store
//!
//! A small in-process store mapping property names to JSON-like values,
//! with change listeners that only fire when a value actually changes.
//!
//! # Features
//!
//! - **Deep Change Detection**: Writes are compared structurally; writing an
//!   equal value is a silent no-op
//! - **Key and Wildcard Listeners**: Listen to one property or to all of them
//! - **Ordered Broadcast**: Wildcard listeners run before key listeners, each
//!   in registration order
//! - **Snapshots**: Reads hand out independent copies of the state
//! - **Change Feed**: Consume owned change events through an iterator
//!
//! # Quick Start
//!
//! ```rust
//! use observable_store::ObservableStore;
//! use serde_json::json;
//!
//! let store = ObservableStore::new();
//!
//! store.on_any_changed(|key, old, new| {
//!     println!("{key}: {old:?} -> {new}");
//! });
//! store.on_changed("volume", |_old, new| {
//!     println!("volume is now {new}");
//! });
//!
//! store.set_property("volume", 50).unwrap();
//! store.set_property("playlist", json!({"name": "Focus", "tracks": [1, 2]})).unwrap();
//!
//! let snapshot = store.get_state();
//! assert_eq!(snapshot.get("volume"), Some(&json!(50)));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ObservableStore
//!     │
//!     ├── state: Map<String, Value>
//!     │
//!     ├── listeners: ListenerRegistry
//!     │       ├── by_key: key -> [KeyListener]
//!     │       └── any: [AnyListener]
//!     │
//!     └── config: StoreConfig { debug }
//! ```

// Modules
pub mod config;
pub mod equality;
pub mod error;
pub mod event;
pub mod iter;
pub mod listener;
pub mod logging;
pub mod property;
pub mod snapshot;
pub mod store;

// Re-exports - Public API
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use event::ChangeEvent;
pub use iter::{ChangeIterator, TimeoutIter, TryIter};
pub use listener::{AnyListener, KeyListener, ListenerId, ListenerTarget, Subscription};
pub use logging::{init_logging, init_logging_from_env, init_silent, LoggingError, LoggingMode};
pub use property::Property;
pub use snapshot::{Snapshot, State};
pub use store::ObservableStore;

pub use serde_json::Value;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::StoreConfig;
    pub use crate::error::{Result, StoreError};
    pub use crate::event::ChangeEvent;
    pub use crate::iter::ChangeIterator;
    pub use crate::listener::Subscription;
    pub use crate::property::Property;
    pub use crate::snapshot::{Snapshot, State};
    pub use crate::store::ObservableStore;
    pub use serde_json::{json, Value};
}
