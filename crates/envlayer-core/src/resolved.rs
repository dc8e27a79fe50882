//! The output of resolving an environment

use serde::Serialize;
use serde_json::Value;

use crate::value::{Properties, PropertyValue};
use crate::{Error, Result};

/// Fully resolved properties of one environment
///
/// Every absent value has been filled from the environment and every
/// string value has had its placeholders substituted. Nothing here is
/// cached; each `resolve` call builds a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProperties {
    /// Name of the environment that was resolved
    environment: String,

    /// Resolved values
    properties: Properties,
}

impl ResolvedProperties {
    pub(crate) fn new(environment: String, properties: Properties) -> Self {
        Self {
            environment,
            properties,
        }
    }

    /// Name of the environment these properties belong to
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Get a value by key, failing with [`Error::KeyNotFound`] if missing
    pub fn require(&self, key: &str) -> Result<&PropertyValue> {
        self.properties.get(key).ok_or_else(|| Error::KeyNotFound {
            key: key.to_string(),
            environment: self.environment.clone(),
        })
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Iterate over keys and values in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Borrow the underlying property map
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Take the underlying property map
    pub fn into_properties(self) -> Properties {
        self.properties
    }

    /// Convert the properties to a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.properties
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ResolvedProperties {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
