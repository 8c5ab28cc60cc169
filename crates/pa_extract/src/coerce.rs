//! crates/pa_extract/src/coerce.rs
//! Coercion of arbitrary JSON values into display strings or numbers.
//!
//! The upstream payload wraps the same concept in whatever shape the schema
//! of the day produced: a bare string, a number, or an object carrying a
//! `display`/`value`/`amount` member. Coercion applies a fixed priority list
//! and is total. The one hard rule: **never** surface a stringified object
//! literal to the rendered output — that class of leak always falls through
//! to the fallback instead.

use serde_json::Value;

use crate::money::parse_amount;
use pa_core::format::format_currency;

/// Object members probed, in order, for a displayable primitive.
const DISPLAY_KEYS: [&str; 8] =
    ["display", "formatted", "value", "label", "name", "text", "title", "description"];

/// Object members probed, in order, for a numeric amount.
const AMOUNT_KEYS: [&str; 3] = ["amount", "total", "value"];

/// Longest string accepted by the last-resort key scan.
const SHORT_STRING_MAX: usize = 100;

/// Coerce `value` into a display string, using `fallback` when nothing
/// displayable exists.
pub fn coerce_text(value: &Value, fallback: &str) -> String {
    match value {
        Value::Null => fallback.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => (if *b { "Yes" } else { "No" }).to_string(),
        // An array has no single display form.
        Value::Array(_) => fallback.to_string(),
        Value::Object(map) => {
            // 1. well-known display members holding a primitive
            for key in DISPLAY_KEYS {
                if let Some(text) = map.get(key).and_then(primitive_text) {
                    return text;
                }
            }
            // 2. well-known numeric members, rendered as currency
            for key in AMOUNT_KEYS {
                if let Some(n) = map.get(key).and_then(Value::as_f64) {
                    return format_currency(n);
                }
            }
            // 3. first own value that is a short string or a number
            for v in map.values() {
                match v {
                    Value::String(s) if !s.is_empty() && s.len() < SHORT_STRING_MAX => {
                        return s.clone();
                    }
                    Value::Number(n) => return n.to_string(),
                    _ => {}
                }
            }
            fallback.to_string()
        }
    }
}

/// Coerce `value` into a number, using `fallback` when nothing numeric exists.
pub fn coerce_number(value: &Value, fallback: f64) -> f64 {
    match value {
        Value::Null => fallback,
        Value::Number(n) => n.as_f64().unwrap_or(fallback),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                return fallback;
            }
            if let Ok(v) = t.parse::<f64>() {
                return v;
            }
            let parsed = parse_amount(t);
            if parsed != 0.0 {
                parsed
            } else {
                fallback
            }
        }
        Value::Array(_) => fallback,
        Value::Object(map) => {
            for key in AMOUNT_KEYS {
                if let Some(n) = map.get(key).and_then(Value::as_f64) {
                    return n;
                }
            }
            for v in map.values() {
                if let Some(n) = v.as_f64() {
                    return n;
                }
            }
            fallback
        }
    }
}

fn primitive_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some((if *b { "Yes" } else { "No" }).to_string()),
        _ => None,
    }
}
