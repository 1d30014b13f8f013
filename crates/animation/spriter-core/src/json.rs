//! Permissive readers over `serde_json::Value`.
//!
//! Authored SCON files coerce freely between strings and numbers and
//! collapse single-element arrays to bare objects, so the document loader
//! walks the JSON tree with these helpers instead of rigid typed
//! deserialization. A missing or malformed field always resolves to the
//! caller's default, never to an error.

use serde_json::Value;

pub fn load_bool(json: &Value, key: &str, def: bool) -> bool {
    match json.get(key) {
        Some(Value::String(s)) => s == "true",
        Some(Value::Bool(b)) => *b,
        _ => def,
    }
}

pub fn load_float(json: &Value, key: &str, def: f64) -> f64 {
    match json.get(key) {
        Some(Value::String(s)) => s.parse().unwrap_or(def),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(def),
        _ => def,
    }
}

pub fn load_int(json: &Value, key: &str, def: i32) -> i32 {
    match json.get(key) {
        Some(Value::String(s)) => s.parse().unwrap_or(def),
        // Truncate toward zero like the format's other integer fields.
        Some(Value::Number(n)) => n.as_f64().map(|f| f as i32).unwrap_or(def),
        _ => def,
    }
}

pub fn load_string(json: &Value, key: &str, def: &str) -> String {
    match json.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => def.to_string(),
    }
}

/// Normalize an array-or-single-object field: absent yields an empty slice,
/// an array yields its elements, anything else yields a singleton.
pub fn make_array<'a>(json: &'a Value, key: &str) -> Vec<&'a Value> {
    match json.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) => vec![single],
    }
}
