//! Deep structural equality for state values
//!
//! Change detection compares values by structure rather than identity:
//! - objects are equal when they hold the same keys with equal values,
//!   whatever the key order
//! - arrays are compared element by element, order included
//! - numbers are compared by numeric value, so `1` and `1.0` are equal
//! - an absent value is never equal to a present one, `null` included

use serde_json::{Number, Value};

/// Compare the value currently stored under a key against a candidate
///
/// `current` is `None` when the key is absent.
pub fn deep_equal(current: Option<&Value>, candidate: &Value) -> bool {
    current.is_some_and(|current| values_equal(current, candidate))
}

/// Structural equality between two state values
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => false,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    // Integers compare exactly; anything involving a float compares as f64
    match (as_integer(a), as_integer(b)) {
        (Some(a), Some(b)) => a == b,
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}
