//! Well-known dataset keys and the arguments that fill them

use envlayer_core::{Properties, PropertyValue};
use std::collections::BTreeMap;

pub const PROJECT_ID: &str = "project_id";
/// Set to the environment name so values can use `{env}`
pub const ENV: &str = "env";
pub const DATASET_NAME: &str = "dataset_name";
pub const INTERNAL_TABLES: &str = "internal_tables";
pub const EXTERNAL_TABLES: &str = "external_tables";

/// Keys that every dataset environment carries
pub const FIXED_KEYS: [&str; 5] = [PROJECT_ID, ENV, DATASET_NAME, INTERNAL_TABLES, EXTERNAL_TABLES];

/// Dataset name stored when the master environment is built without one
pub const UNSET_DATASET_NAME: &str = "None";

/// Check if `key` is a caller-defined property rather than a fixed one
pub fn is_extra_property(key: &str) -> bool {
    !FIXED_KEYS.contains(&key)
}

/// Arguments for one dataset environment
///
/// Used both to build the initial environment of a
/// [`DatasetConfig`](crate::DatasetConfig) and to add environments to it.
/// Fields left unset are filled with defaults for the initial environment
/// and inherited from the master for added ones.
///
/// # Example
///
/// ```
/// use envlayer_core::PropertyValue;
/// use envlayer_dataset::DatasetProperties;
///
/// let props = DatasetProperties::new("dev", "my-project")
///     .dataset_name("{env}_events")
///     .internal_tables(["events", "users"])
///     .external_tables([("geo", "shared.geo.regions")])
///     .property("bucket", "{project_id}-tmp")
///     .property("token", PropertyValue::Absent);
/// assert_eq!(props.env(), "dev");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetProperties {
    env: String,
    project_id: PropertyValue,
    dataset_name: Option<PropertyValue>,
    internal_tables: Option<Vec<String>>,
    external_tables: Option<BTreeMap<String, String>>,
    properties: Properties,
}

impl DatasetProperties {
    /// Start with the environment name and project id
    ///
    /// Pass `None::<&str>` or [`PropertyValue::Absent`] as `project_id` to
    /// read it from the environment at resolution time.
    pub fn new(env: impl Into<String>, project_id: impl Into<PropertyValue>) -> Self {
        Self {
            env: env.into(),
            project_id: project_id.into(),
            dataset_name: None,
            internal_tables: None,
            external_tables: None,
            properties: Properties::new(),
        }
    }

    pub fn dataset_name(mut self, dataset_name: impl Into<PropertyValue>) -> Self {
        self.dataset_name = Some(dataset_name.into());
        self
    }

    pub fn internal_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.internal_tables = Some(tables.into_iter().map(Into::into).collect());
        self
    }

    pub fn external_tables<I, K, V>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.external_tables = Some(
            tables
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Add one extra property
    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Add several extra properties
    pub fn properties(mut self, properties: Properties) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    /// Property set for the initial environment of a store
    ///
    /// Fixed keys always replace extras of the same name; unset ones get
    /// defaults.
    pub(crate) fn into_initial(self) -> (String, Properties) {
        let mut all = self.properties;
        all.insert(PROJECT_ID.to_string(), self.project_id);
        all.insert(ENV.to_string(), PropertyValue::String(self.env.clone()));
        all.insert(
            DATASET_NAME.to_string(),
            self.dataset_name
                .unwrap_or_else(|| PropertyValue::from(UNSET_DATASET_NAME)),
        );
        all.insert(
            INTERNAL_TABLES.to_string(),
            PropertyValue::StringList(self.internal_tables.unwrap_or_default()),
        );
        all.insert(
            EXTERNAL_TABLES.to_string(),
            PropertyValue::StringMap(self.external_tables.unwrap_or_default()),
        );
        (self.env, all)
    }

    /// Override set for an environment added on top of the master
    ///
    /// `project_id` and `env` are always written. The other fixed keys are
    /// only written when given a non-empty value; otherwise the master's
    /// value is inherited.
    pub(crate) fn into_overrides(self) -> (String, Properties) {
        let mut all = self.properties;
        all.insert(PROJECT_ID.to_string(), self.project_id);
        all.insert(ENV.to_string(), PropertyValue::String(self.env.clone()));

        if let Some(dataset_name) = self.dataset_name.filter(|name| !is_empty(name)) {
            all.insert(DATASET_NAME.to_string(), dataset_name);
        }
        if let Some(tables) = self.internal_tables.filter(|t| !t.is_empty()) {
            all.insert(INTERNAL_TABLES.to_string(), PropertyValue::StringList(tables));
        }
        if let Some(tables) = self.external_tables.filter(|t| !t.is_empty()) {
            all.insert(EXTERNAL_TABLES.to_string(), PropertyValue::StringMap(tables));
        }
        (self.env, all)
    }
}

/// Values that do not count as "given" when overriding
fn is_empty(value: &PropertyValue) -> bool {
    match value {
        PropertyValue::String(s) => s.is_empty(),
        PropertyValue::StringList(list) => list.is_empty(),
        PropertyValue::StringMap(map) => map.is_empty(),
        PropertyValue::Absent => true,
        PropertyValue::Other(value) => value.is_null(),
    }
}
