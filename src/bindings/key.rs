//! Canonical cache keys.
//!
//! Keys are derived from serialized parameters with every object's fields
//! sorted, so two requests that differ only in field order share a key.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Builds `base` or `base:{params}` with params rendered canonically.
///
/// Parameters that serialize to `null` (including `()` and `None`) add
/// nothing to the key.
pub fn canonical_key<P>(base: &str, params: &P) -> Result<String>
where
    P: Serialize + ?Sized,
{
    let value = canonicalize(serde_json::to_value(params)?);
    if value.is_null() {
        return Ok(base.to_string());
    }
    Ok(format!("{base}:{}", serde_json::to_string(&value)?))
}

/// Key for a memoized computation: `memo:{name}` plus its dependencies.
pub fn memo_key<D>(name: &str, deps: &D) -> Result<String>
where
    D: Serialize + ?Sized,
{
    canonical_key(&memo_base(name), deps)
}

pub(crate) fn memo_base(name: &str) -> String {
    format!("memo:{}", escape_segment(name))
}

/// Escapes `:` (and `%`) in a caller-supplied name so it cannot extend
/// into the next segment of a key.
pub fn escape_segment(segment: &str) -> Cow<'_, str> {
    if !segment.contains([':', '%']) {
        return Cow::Borrowed(segment);
    }
    Cow::Owned(segment.replace('%', "%25").replace(':', "%3A"))
}

/// Returns `value` with the fields of every nested object in sorted order.
pub fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
