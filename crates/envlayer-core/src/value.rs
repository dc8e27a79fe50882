//! Property values and property sets
//!
//! A property set mixes plain strings, string lists, string maps, values
//! that still have to be read from the environment, and arbitrary JSON.
//! `PropertyValue` keeps those cases apart so resolution can match on them
//! instead of probing types at runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Ordered mapping from property key to value
///
/// Ordered so that resolution walks keys in a stable order.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum PropertyValue {
    /// Plain string; the only variant placeholders are substituted in
    String(String),

    /// List of strings, e.g. table names
    StringList(Vec<String>),

    /// String to string mapping, e.g. table aliases to table ids
    StringMap(BTreeMap<String, String>),

    /// Not set yet; filled from `<prefix><key>` at resolution time
    Absent,

    /// Any other structured value, passed through untouched
    Other(Value),
}

impl PropertyValue {
    /// Borrow the value as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the value as a string list, if it is one
    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            Self::StringList(list) => Some(list),
            _ => None,
        }
    }

    /// Borrow the value as a string map, if it is one
    pub fn as_string_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::StringMap(map) => Some(map),
            _ => None,
        }
    }

    /// Check if this is the absent-marker
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Short variant name, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::StringList(_) => "string list",
            Self::StringMap(_) => "string map",
            Self::Absent => "absent",
            Self::Other(_) => "other",
        }
    }

    /// Render the value as JSON. The absent-marker becomes `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::StringList(list) => {
                Value::Array(list.iter().cloned().map(Value::String).collect())
            }
            Self::StringMap(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
            Self::Absent => Value::Null,
            Self::Other(value) => value.clone(),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

impl<const N: usize> From<[&str; N]> for PropertyValue {
    fn from(value: [&str; N]) -> Self {
        Self::StringList(value.iter().map(|s| s.to_string()).collect())
    }
}

impl From<BTreeMap<String, String>> for PropertyValue {
    fn from(value: BTreeMap<String, String>) -> Self {
        Self::StringMap(value)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::String(s) => Self::String(s),
            Value::Array(items) if items.iter().all(Value::is_string) => Self::StringList(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::Object(entries) if entries.values().all(Value::is_string) => Self::StringMap(
                entries
                    .into_iter()
                    .filter_map(|(k, v)| match v {
                        Value::String(s) => Some((k, s)),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Self::Other(other),
        }
    }
}

impl From<PropertyValue> for Value {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Other(value) => value,
            other => other.to_json(),
        }
    }
}
