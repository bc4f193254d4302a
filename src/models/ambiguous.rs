//! Decoding of loosely-typed numeric fields
//!
//! The cloud API documents some fields inconsistently across endpoints:
//! `user_index` arrives as a number, a numeric string, an array of numbers,
//! or `null` depending on where it is returned. [`AmbiguousIntCollection`]
//! hides that behind a single ordered `Vec<i64>`.

use crate::error::{RemoError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::ops::Deref;
use tracing::warn;

/// Wire shape of an ambiguous field, tagged at the deserialization boundary
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Null,
    Number(Number),
    String(String),
    Array(Vec<Value>),
    /// Booleans and objects, which no endpoint is documented to send
    Other(Value),
}

impl From<Value> for WireValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => WireValue::Null,
            Value::Number(n) => WireValue::Number(n),
            Value::String(s) => WireValue::String(s),
            Value::Array(items) => WireValue::Array(items),
            other => WireValue::Other(other),
        }
    }
}

/// Decode a wire value into an ordered integer sequence.
///
/// Numbers and numeric strings become a single element, unparseable strings
/// and `null` become an empty sequence. Arrays must contain only numeric
/// elements; anything else is a decode error for the whole field.
pub fn decode(value: &WireValue) -> Result<Vec<i64>> {
    match value {
        WireValue::Null => Ok(Vec::new()),
        WireValue::Number(n) => Ok(vec![number_to_i64(n)]),
        WireValue::String(s) => Ok(parse_int(s).into_iter().collect()),
        WireValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Number(n) => Ok(number_to_i64(n)),
                Value::String(s) => parse_int(s).ok_or_else(|| {
                    RemoError::decode("array", format!("element {index} is not numeric: {s:?}"))
                }),
                other => Err(RemoError::decode(
                    "array",
                    format!("element {index} is not numeric: {other}"),
                )),
            })
            .collect(),
        WireValue::Other(other) => Err(RemoError::decode(
            "value",
            format!("unexpected JSON value: {other}"),
        )),
    }
}

/// Decode, recovering from a decode error by returning an empty sequence
pub fn decode_lossy(value: &WireValue, field: &str) -> Vec<i64> {
    decode(value).unwrap_or_else(|e| {
        warn!("Treating ambiguous field '{field}' as empty: {e}");
        Vec::new()
    })
}

/// Encode an integer sequence as a JSON array, whatever its original shape
pub fn encode(values: &[i64]) -> Value {
    Value::Array(values.iter().map(|v| Value::from(*v)).collect())
}

fn number_to_i64(n: &Number) -> i64 {
    n.as_i64()
        .or_else(|| n.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
        .unwrap_or_else(|| n.as_f64().map_or(0, |f| f.trunc() as i64))
}

fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

/// An ordered integer sequence whose wire form may be a number, a numeric
/// string, an array or null. Always serializes as an array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbiguousIntCollection(Vec<i64>);

impl AmbiguousIntCollection {
    pub fn new(values: Vec<i64>) -> Self {
        Self(values)
    }

    pub fn into_inner(self) -> Vec<i64> {
        self.0
    }
}

impl Deref for AmbiguousIntCollection {
    type Target = [i64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<i64>> for AmbiguousIntCollection {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

impl<'de> Deserialize<'de> for AmbiguousIntCollection {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self(decode_lossy(&WireValue::from(raw), "user_index")))
    }
}

impl Serialize for AmbiguousIntCollection {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.0.iter())
    }
}

/// Deserialize an optional string field that some endpoints send as a number
pub fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
