//! crates/pa_extract/src/canon.rs
//! Canonical JSON bytes: recursively key-sorted objects, compact encoding.
//!
//! Digests in the generation record are computed over these bytes so the id
//! of a document does not depend on map insertion order anywhere upstream.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::ExtractResult;

/// Serialize `value` to canonical bytes (sorted keys, compact separators).
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> ExtractResult<Vec<u8>> {
    let v = serde_json::to_value(value)?;
    let canonical = canonicalize(&v);
    Ok(serde_json::to_vec(&canonical)?)
}

/// Rebuild `v` with every object's keys in lexicographic order.
pub fn canonicalize(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::with_capacity(map.len());
            for k in keys {
                // key came from the map; entry is always present
                if let Some(inner) = map.get(k) {
                    out.insert(k.clone(), canonicalize(inner));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
