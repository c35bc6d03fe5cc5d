//! Lenient deserializers for vendor records.
//!
//! The camera service is inconsistent about whether identifiers and
//! timestamps arrive as JSON strings or numbers.

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

pub(crate) fn epoch_secs<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("timestamp out of range"))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{s}': {e}")))?,
        other => {
            return Err(D::Error::custom(format!(
                "expected numeric timestamp, got {other}"
            )))
        }
    };
    if !secs.is_finite() {
        return Err(D::Error::custom("timestamp is not finite"));
    }
    Ok(secs)
}

/// Cuepoint types arrive either as one tag string or a list of tags.
pub(crate) fn type_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(",")),
        Some(other) => Err(D::Error::custom(format!(
            "expected cuepoint type tag, got {other}"
        ))),
    }
}
