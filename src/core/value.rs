//! Purpose: Decoded log values as an explicit tagged union.
//! Exports: `Value`, `Object`, `decode_first`.
//! Role: Single decode boundary between `serde_json` and the shell serializer.
//! Invariants: Numbers keep the literal text they were decoded from (no float rounding).
//! Invariants: Object keys iterate in byte-lexicographic order.
use std::collections::BTreeMap;

use serde::Deserialize;

pub type Object = BTreeMap<String, Value>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Source text of the number, e.g. `5`, `-0.10`, `1e400`.
    Number(String),
    String(String),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.to_string()),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Decode the first JSON value in `input`; anything after it is ignored.
pub fn decode_first(input: &str) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(input);
    let value = serde_json::Value::deserialize(&mut de)?;
    Ok(Value::from(value))
}
