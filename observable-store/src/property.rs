//! Typed access to well-known properties
//!
//! The store is keyed by plain strings. Applications that keep a fixed set of
//! properties can describe each one as a type and read or write it without
//! repeating the key or converting values by hand.
//!
//! # Example
//!
//! ```rust
//! use observable_store::{ObservableStore, Property};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! pub struct Temperature(pub f32);
//!
//! impl Property for Temperature {
//!     const KEY: &'static str = "temperature";
//! }
//!
//! let store = ObservableStore::new();
//! store.set(Temperature(21.5)).unwrap();
//!
//! assert_eq!(store.get::<Temperature>().unwrap(), Some(Temperature(21.5)));
//! assert_eq!(store.get_property("temperature"), Some(serde_json::json!(21.5)));
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::ObservableStore;

/// A property stored under a fixed key
///
/// The value is kept in its serialized form, so change detection uses the
/// same structural comparison as untyped writes.
pub trait Property: Serialize + DeserializeOwned + 'static {
    /// Key the property is stored under
    const KEY: &'static str;
}

impl ObservableStore {
    /// Read a typed property
    pub fn get<P: Property>(&self) -> Result<Option<P>> {
        self.get_property_as(P::KEY)
    }

    /// Write a typed property, returning whether the stored value changed
    pub fn set<P: Property>(&self, value: P) -> Result<bool> {
        self.set_property(P::KEY, value)
    }

    /// Listen for changes to a typed property
    ///
    /// Values that no longer deserialize as `P` (for example after an untyped
    /// write under the same key) are passed as `None`.
    pub fn on_property_changed<P, F>(&self, listener: F) -> crate::Subscription
    where
        P: Property,
        F: Fn(Option<P>, Option<P>) + Send + Sync + 'static,
    {
        self.on_changed(P::KEY, move |old, new| {
            let old = old.and_then(|v| P::deserialize(v).ok());
            let new = P::deserialize(new).ok();
            listener(old, new);
        })
    }
}
