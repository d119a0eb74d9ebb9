//! Pure functions mapping `(prev, curr)` snapshots to a minimal delta, and
//! back again.

use serde_json::{Map, Value};

/// Compute the minimal delta that turns `prev` into `curr`, dispatching on
/// the *value kind of `curr`* at every level.
///
/// `prev` may be `None` (nothing seen yet) or any JSON value; a mismatched
/// or absent `prev` at any level degrades gracefully to "this subtree is
/// entirely new", which recursively yields the full value.
pub fn compute_delta(prev: Option<&Value>, curr: &Value) -> Value {
    match curr {
        Value::Number(_) | Value::Bool(_) | Value::Null => curr.clone(),

        Value::String(curr_s) => {
            let prev_s = match prev {
                Some(Value::String(s)) => Some(s.as_str()),
                Some(Value::Null) | None => Some(""),
                Some(_) => None,
            };
            match prev_s {
                Some(p) if curr_s.starts_with(p) => Value::String(curr_s[p.len()..].to_string()),
                _ => curr.clone(),
            }
        }

        Value::Array(curr_arr) => {
            let prev_arr = match prev {
                Some(Value::Array(a)) => Some(a),
                _ => None,
            };
            Value::Array(
                curr_arr
                    .iter()
                    .enumerate()
                    .map(|(i, item)| compute_delta(prev_arr.and_then(|a| a.get(i)), item))
                    .collect(),
            )
        }

        Value::Object(curr_map) => {
            let prev_map = match prev {
                Some(Value::Object(m)) => Some(m),
                _ => None,
            };
            let mut out = Map::new();
            for (key, value) in curr_map {
                let prev_value = prev_map.and_then(|m| m.get(key));
                out.insert(key.clone(), compute_delta(prev_value, value));
            }
            Value::Object(out)
        }
    }
}

/// Apply `delta` (as produced by [`compute_delta`]) on top of `prev`:
/// strings append when both sides are strings, sequences merge
/// element-wise under the same rules, mappings overlay with prev-only keys
/// preserved, everything else replaces.
pub fn apply_delta(prev: Option<&Value>, delta: &Value) -> Value {
    match delta {
        Value::String(delta_s) => match prev {
            Some(Value::String(prev_s)) => Value::String(format!("{prev_s}{delta_s}")),
            _ => delta.clone(),
        },

        Value::Array(delta_arr) => {
            let prev_arr = match prev {
                Some(Value::Array(a)) => Some(a),
                _ => None,
            };
            Value::Array(
                delta_arr
                    .iter()
                    .enumerate()
                    .map(|(i, item)| apply_delta(prev_arr.and_then(|a| a.get(i)), item))
                    .collect(),
            )
        }

        Value::Object(delta_map) => {
            let prev_map = match prev {
                Some(Value::Object(m)) => Some(m),
                _ => None,
            };
            let mut out = prev_map.cloned().unwrap_or_default();
            for (key, value) in delta_map {
                let prev_value = prev_map.and_then(|m| m.get(key));
                out.insert(key.clone(), apply_delta(prev_value, value));
            }
            Value::Object(out)
        }

        // numbers, booleans, null: always a full replacement
        _ => delta.clone(),
    }
}
