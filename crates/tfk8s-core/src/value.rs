//! Tri-state configuration values
//!
//! A configuration value is either null (absent), unknown (not resolved yet,
//! which happens while planning) or concrete. Validators only ever look at
//! concrete values.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Marker used in configuration files for values that are not known yet
pub const UNKNOWN_MARKER: &str = "(known after apply)";

/// A configuration value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent from configuration
    #[default]
    Null,
    /// Not resolved yet
    Unknown,
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Whether the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value is unknown
    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    /// Whether the value is neither null nor unknown
    pub fn is_known(&self) -> bool {
        !self.is_null() && !self.is_unknown()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a key in a map value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Human-readable type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Unknown => "unknown",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Int(_) => "number",
            Value::Float(_) => "number",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Build a value from JSON, honouring the unknown marker
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            JsonValue::String(s) if s == UNKNOWN_MARKER => Value::Unknown,
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(obj) => Value::Map(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Parse a YAML (or JSON) document into a value
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let json: JsonValue = serde_yaml::from_str(content)?;
        Ok(Value::from_json(&json))
    }

    /// Load a configuration file (YAML or JSON)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Convert a concrete value to JSON
    ///
    /// Unknown values have no JSON representation and become `None`.
    pub fn to_json(&self) -> Option<JsonValue> {
        Some(match self {
            Value::Null => JsonValue::Null,
            Value::Unknown => return None,
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::from(*i),
            Value::Float(f) => JsonValue::from(*f),
            Value::List(items) => JsonValue::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Value::Map(map) => {
                let mut obj = serde_json::Map::new();
                for (k, v) in map {
                    obj.insert(k.clone(), v.to_json()?);
                }
                JsonValue::Object(obj)
            }
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Unknown => write!(f, "{}", UNKNOWN_MARKER),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::List(_) | Value::Map(_) => match self.to_json() {
                Some(json) => write!(f, "{}", json),
                None => write!(f, "{}", UNKNOWN_MARKER),
            },
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
