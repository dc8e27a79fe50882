//! The dataset configuration facade

use envlayer_core::{ConfigStore, EnvSource, Properties, PropertyValue, ResolvedProperties};
use std::collections::BTreeMap;

use crate::manager::{DatasetManagerFactory, DatasetManagerSpec};
use crate::properties::{
    DATASET_NAME, DatasetProperties, EXTERNAL_TABLES, INTERNAL_TABLES, PROJECT_ID,
    is_extra_property,
};
use crate::{Error, Result};

/// Dataset environments backed by a [`ConfigStore`]
///
/// Every accessor takes an optional environment name. `None` means the
/// environment named by the `<prefix>env` variable.
#[derive(Debug)]
pub struct DatasetConfig {
    store: ConfigStore,
}

impl DatasetConfig {
    /// Create a configuration with one environment
    ///
    /// When `is_master` is true, environments added later inherit from it.
    pub fn new(properties: DatasetProperties, is_master: bool) -> Self {
        let (env, all_properties) = properties.into_initial();
        Self {
            store: ConfigStore::new(env, all_properties, is_master),
        }
    }

    /// Set the prefix used to build env-var names
    pub fn with_env_var_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.store = self.store.with_env_var_prefix(prefix);
        self
    }

    /// Replace the env-var source used during resolution
    pub fn with_env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.store = self.store.with_env_source(source);
        self
    }

    /// Add an environment on top of the master
    ///
    /// `project_id` and `env` are always overridden. Dataset name and
    /// tables are only overridden when given non-empty values.
    pub fn add_configuration(&mut self, properties: DatasetProperties) -> &mut Self {
        let (env, overrides) = properties.into_overrides();
        self.store.add_configuration(env, overrides);
        self
    }

    /// The underlying store
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Resolve every property of an environment
    pub fn resolve(&self, env: Option<&str>) -> Result<ResolvedProperties> {
        Ok(self.store.resolve(env)?)
    }

    /// Resolve a single property of an environment
    pub fn resolve_property(&self, key: &str, env: Option<&str>) -> Result<PropertyValue> {
        Ok(self.store.resolve_property(key, env)?)
    }

    pub fn resolve_project_id(&self, env: Option<&str>) -> Result<String> {
        expect_string(PROJECT_ID, self.resolve_property(PROJECT_ID, env)?)
    }

    pub fn resolve_dataset_name(&self, env: Option<&str>) -> Result<String> {
        expect_string(DATASET_NAME, self.resolve_property(DATASET_NAME, env)?)
    }

    pub fn resolve_internal_tables(&self, env: Option<&str>) -> Result<Vec<String>> {
        expect_string_list(INTERNAL_TABLES, self.resolve_property(INTERNAL_TABLES, env)?)
    }

    pub fn resolve_external_tables(&self, env: Option<&str>) -> Result<BTreeMap<String, String>> {
        expect_string_map(EXTERNAL_TABLES, self.resolve_property(EXTERNAL_TABLES, env)?)
    }

    /// Resolve an environment and keep only the caller-defined properties
    pub fn resolve_extra_properties(&self, env: Option<&str>) -> Result<Properties> {
        Ok(extra_properties(&self.resolve(env)?))
    }

    /// Resolve an environment and build a dataset manager from it
    ///
    /// Whatever the factory returns is handed back unchanged.
    pub fn create_dataset_manager<F>(&self, env: Option<&str>, factory: &F) -> Result<F::Manager>
    where
        F: DatasetManagerFactory + ?Sized,
    {
        let resolved = self.resolve(env)?;
        tracing::debug!(environment = %resolved.environment(), "Creating dataset manager");

        let spec = DatasetManagerSpec {
            project_id: expect_string(PROJECT_ID, resolved.require(PROJECT_ID)?.clone())?,
            dataset_name: expect_string(DATASET_NAME, resolved.require(DATASET_NAME)?.clone())?,
            internal_tables: expect_string_list(
                INTERNAL_TABLES,
                resolved.require(INTERNAL_TABLES)?.clone(),
            )?,
            external_tables: expect_string_map(
                EXTERNAL_TABLES,
                resolved.require(EXTERNAL_TABLES)?.clone(),
            )?,
            extras: extra_properties(&resolved),
        };

        Ok(factory.create(spec))
    }
}

fn extra_properties(resolved: &ResolvedProperties) -> Properties {
    resolved
        .iter()
        .filter(|(key, _)| is_extra_property(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn expect_string(key: &str, value: PropertyValue) -> Result<String> {
    match value {
        PropertyValue::String(s) => Ok(s),
        other => Err(unexpected(key, "string", &other)),
    }
}

fn expect_string_list(key: &str, value: PropertyValue) -> Result<Vec<String>> {
    match value {
        PropertyValue::StringList(list) => Ok(list),
        other => Err(unexpected(key, "string list", &other)),
    }
}

fn expect_string_map(key: &str, value: PropertyValue) -> Result<BTreeMap<String, String>> {
    match value {
        PropertyValue::StringMap(map) => Ok(map),
        other => Err(unexpected(key, "string map", &other)),
    }
}

fn unexpected(key: &str, expected: &'static str, found: &PropertyValue) -> Error {
    Error::UnexpectedType {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}
