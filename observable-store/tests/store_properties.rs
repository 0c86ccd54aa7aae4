//! Property-based tests for the observable store
//!
//! Each block states the property it checks in its doc comment.

use std::sync::Arc;

use observable_store::{ObservableStore, State, Value};
use parking_lot::Mutex;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Strategy for property names
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

/// Strategy for arbitrary nested state values
fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Strategy for whole state maps
fn state_strategy() -> impl Strategy<Value = State> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 0..6)
        .prop_map(|map| map.into_iter().collect())
}

/// Attach a wildcard listener counting notifications per key
fn count_notifications(store: &ObservableStore) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    store.on_any_changed(move |key, _, _| s.lock().push(key.to_string()));
    seen
}

// ============================================================================
// Redundant writes
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Writing the same value twice notifies only on the first write.
    #[test]
    fn prop_repeated_write_notifies_once(key in key_strategy(), value in value_strategy()) {
        let store = ObservableStore::new();
        let seen = count_notifications(&store);

        prop_assert!(store.set_property(&key, value.clone()).unwrap());
        prop_assert!(!store.set_property(&key, value.clone()).unwrap());

        prop_assert_eq!(seen.lock().len(), 1);
        prop_assert_eq!(store.get_property(&key), Some(value));
    }

    /// Re-applying the current state through set_state changes nothing.
    #[test]
    fn prop_set_state_with_current_state_is_silent(initial in state_strategy()) {
        let store = ObservableStore::with_state(initial);
        let seen = count_notifications(&store);

        let current = store.get_state().into_inner();
        prop_assert_eq!(store.set_state(current), 0);
        prop_assert!(seen.lock().is_empty());
    }
}

// ============================================================================
// Notification payloads
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Listeners receive exactly the previous and the new value.
    #[test]
    fn prop_listener_sees_old_and_new(
        key in key_strategy(),
        first in value_strategy(),
        second in value_strategy(),
    ) {
        let store = ObservableStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        store.on_changed(key.clone(), move |old, new| {
            s.lock().push((old.cloned(), new.clone()));
        });

        store.set_property(&key, first.clone()).unwrap();
        let changed = store.set_property(&key, second.clone()).unwrap();

        let seen = seen.lock();
        prop_assert_eq!(&seen[0], &(None, first.clone()));
        if changed {
            prop_assert_eq!(seen.len(), 2);
            prop_assert_eq!(&seen[1], &(Some(first), second));
        } else {
            prop_assert_eq!(seen.len(), 1);
        }
    }

    /// set_state notifies exactly the keys whose value differs.
    #[test]
    fn prop_set_state_notifies_changed_keys(initial in state_strategy(), update in state_strategy()) {
        let store = ObservableStore::with_state(initial.clone());
        let seen = count_notifications(&store);

        let expected: Vec<String> = update
            .iter()
            .filter(|(key, value)| {
                !observable_store::equality::deep_equal(initial.get(key.as_str()), value)
            })
            .map(|(key, _)| key.clone())
            .collect();

        let changed = store.set_state(update);

        prop_assert_eq!(changed, expected.len());
        prop_assert_eq!(&*seen.lock(), &expected);
    }
}

// ============================================================================
// Snapshots and clearing
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Editing a snapshot's map never reaches the store.
    #[test]
    fn prop_snapshot_isolation(initial in state_strategy(), key in key_strategy(), value in value_strategy()) {
        let store = ObservableStore::with_state(initial);
        let before = store.get_state();

        let mut edited = before.clone().into_inner();
        edited.insert(key, value);
        edited.clear();

        prop_assert_eq!(store.get_state(), before);
    }

    /// Clearing removes everything and notifies no one.
    #[test]
    fn prop_clear_is_silent(initial in state_strategy()) {
        let store = ObservableStore::with_state(initial);
        let seen = count_notifications(&store);

        store.clear_state();

        prop_assert!(store.get_state().is_empty());
        prop_assert!(seen.lock().is_empty());
    }
}
