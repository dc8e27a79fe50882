//! The configuration store
//!
//! A `ConfigStore` owns a set of named environments. One of them may be the
//! master: every environment added later starts from a copy of the master's
//! properties and applies its own overrides on top.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::env::{EnvSource, ProcessEnv};
use crate::placeholder;
use crate::resolved::ResolvedProperties;
use crate::value::{Properties, PropertyValue};
use crate::{Error, Result};

/// Key looked up (with the prefix) in the environment when no environment
/// name is passed to [`ConfigStore::resolve`]
pub const DEFAULT_ENV_KEY: &str = "env";

/// A named, immutable property set
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentProperties {
    name: String,
    properties: Properties,
}

impl EnvironmentProperties {
    pub fn new(name: impl Into<String>, properties: Properties) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stored, unresolved properties
    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// Named environments with master inheritance, env-var fallback and
/// placeholder substitution
///
/// # Example
///
/// ```
/// use envlayer_core::{ConfigStore, MapEnv, Properties, PropertyValue};
///
/// let mut base = Properties::new();
/// base.insert("bucket".to_string(), "{env}-data".into());
/// base.insert("env".to_string(), PropertyValue::Absent);
///
/// let env = MapEnv::new().with_var("APP_env", "staging");
/// let store = ConfigStore::new("base", base, true)
///     .with_env_var_prefix("APP_")
///     .with_env_source(env);
///
/// let bucket = store.resolve_property("bucket", Some("base")).unwrap();
/// assert_eq!(bucket.as_str(), Some("staging-data"));
/// ```
pub struct ConfigStore {
    /// Name of the master environment, if one was designated
    master_name: Option<String>,

    /// Registered environments keyed by name
    environments: BTreeMap<String, EnvironmentProperties>,

    /// Prepended to property keys to form env-var names
    env_var_prefix: String,

    /// Where env-var lookups go when none is passed explicitly
    env_source: Arc<dyn EnvSource>,
}

impl ConfigStore {
    /// Create a store holding a single environment
    ///
    /// When `is_master` is true the environment becomes the master that
    /// every later [`add_configuration`](Self::add_configuration) call
    /// inherits from. Otherwise there is no master and later environments
    /// start empty.
    ///
    /// The env-var prefix starts empty and lookups go to the process
    /// environment; see [`with_env_var_prefix`](Self::with_env_var_prefix)
    /// and [`with_env_source`](Self::with_env_source).
    pub fn new(name: impl Into<String>, properties: Properties, is_master: bool) -> Self {
        let name = name.into();
        tracing::debug!(environment = %name, is_master, "Creating config store");

        let mut environments = BTreeMap::new();
        environments.insert(
            name.clone(),
            EnvironmentProperties::new(name.clone(), properties),
        );

        Self {
            master_name: is_master.then_some(name),
            environments,
            env_var_prefix: String::new(),
            env_source: Arc::new(ProcessEnv),
        }
    }

    /// Set the prefix used to build env-var names (`<prefix><key>`)
    pub fn with_env_var_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_var_prefix = prefix.into();
        self
    }

    /// Replace the env-var source used by [`resolve`](Self::resolve)
    pub fn with_env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.env_source = Arc::new(source);
        self
    }

    /// Register an environment derived from the master
    ///
    /// The new property set is a copy of the master's properties (or empty
    /// if there is no master) with every entry of `properties` written over
    /// it. An existing environment with the same name is replaced; whatever
    /// overrides it had are lost.
    pub fn add_configuration(
        &mut self,
        name: impl Into<String>,
        properties: Properties,
    ) -> &mut Self {
        let name = name.into();

        let mut all_properties = self.master_properties();
        all_properties.extend(properties);

        if self.environments.contains_key(&name) {
            tracing::warn!(environment = %name, "Replacing existing environment");
        } else {
            tracing::debug!(environment = %name, "Adding environment");
        }

        if self.master_name.as_deref() == Some(name.as_str()) {
            // Re-registering the master changes what later environments inherit
            tracing::warn!(environment = %name, "Master environment overwritten");
        }

        self.environments.insert(
            name.clone(),
            EnvironmentProperties::new(name, all_properties),
        );
        self
    }

    /// Resolve an environment using the store's env-var source
    ///
    /// With `name` set to `None` or an empty string, the environment name
    /// is read from the env var `<prefix>env`.
    ///
    /// # Errors
    ///
    /// - [`Error::NoDefaultEnvironment`] when `name` is `None` or empty and
    ///   the default variable is not set
    /// - [`Error::UnknownEnvironment`] when no environment has that name
    /// - [`Error::MissingEnvVar`] when an absent value has no variable to
    ///   fall back to
    pub fn resolve(&self, name: Option<&str>) -> Result<ResolvedProperties> {
        self.resolve_with(name, self.env_source.as_ref())
    }

    /// Resolve an environment, reading env vars from `env`
    ///
    /// Absent values are filled from `<prefix><key>`. Then every string
    /// value has its `{key}` placeholders replaced with the other string
    /// values of the same environment, in a single pass.
    pub fn resolve_with(
        &self,
        name: Option<&str>,
        env: &dyn EnvSource,
    ) -> Result<ResolvedProperties> {
        let environment = self.environment_for(name, env)?;
        tracing::debug!(environment = %environment.name(), "Resolving environment");

        let mut filled = Properties::new();
        for (key, value) in environment.properties() {
            let value = match value {
                PropertyValue::Absent => PropertyValue::String(self.env_var_for(key, env)?),
                other => other.clone(),
            };
            filled.insert(key.clone(), value);
        }

        let table: BTreeMap<String, String> = filled
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|s| (key.clone(), s.to_string())))
            .collect();

        let properties = filled
            .into_iter()
            .map(|(key, value)| match value {
                PropertyValue::String(s) => {
                    (key, PropertyValue::String(placeholder::substitute(&s, &table)))
                }
                other => (key, other),
            })
            .collect();

        Ok(ResolvedProperties::new(
            environment.name().to_string(),
            properties,
        ))
    }

    /// Resolve an environment and return one of its values
    ///
    /// # Errors
    ///
    /// Everything [`resolve`](Self::resolve) can return, plus
    /// [`Error::KeyNotFound`] when the key is not in the resolved set.
    pub fn resolve_property(&self, key: &str, name: Option<&str>) -> Result<PropertyValue> {
        self.resolve(name)?.require(key).cloned()
    }

    /// Name of the master environment, if any
    pub fn master_name(&self) -> Option<&str> {
        self.master_name.as_deref()
    }

    pub fn env_var_prefix(&self) -> &str {
        &self.env_var_prefix
    }

    /// Get a registered environment by name
    pub fn environment(&self, name: &str) -> Option<&EnvironmentProperties> {
        self.environments.get(name)
    }

    /// Names of all registered environments, in order
    pub fn environment_names(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }

    /// Check if an environment is registered
    pub fn contains(&self, name: &str) -> bool {
        self.environments.contains_key(name)
    }

    /// Number of registered environments
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    /// Copy of the master's stored properties, or empty without a master
    fn master_properties(&self) -> Properties {
        self.master_name
            .as_deref()
            .and_then(|name| self.environments.get(name))
            .map(|master| master.properties().clone())
            .unwrap_or_default()
    }

    /// Pick the environment to resolve, falling back to `<prefix>env`
    /// when no name or an empty name is given
    fn environment_for(
        &self,
        name: Option<&str>,
        env: &dyn EnvSource,
    ) -> Result<&EnvironmentProperties> {
        let used_name = match name.filter(|name| !name.is_empty()) {
            Some(name) => name.to_string(),
            None => {
                let env_var = self.env_var_name(DEFAULT_ENV_KEY);
                let default = env.var(&env_var);
                default.ok_or(Error::NoDefaultEnvironment { env_var })?
            }
        };

        self.environments
            .get(&used_name)
            .ok_or(Error::UnknownEnvironment { name: used_name })
    }

    fn env_var_for(&self, key: &str, env: &dyn EnvSource) -> Result<String> {
        let env_var = self.env_var_name(key);
        tracing::trace!(%key, %env_var, "Reading property from environment");
        env.var(&env_var).ok_or_else(|| Error::MissingEnvVar {
            key: key.to_string(),
            env_var,
        })
    }

    fn env_var_name(&self, key: &str) -> String {
        format!("{}{}", self.env_var_prefix, key)
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("master_name", &self.master_name)
            .field("environments", &self.environments)
            .field("env_var_prefix", &self.env_var_prefix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use pretty_assertions::assert_eq;

    fn props(entries: &[(&str, PropertyValue)]) -> Properties {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn prod_store() -> ConfigStore {
        ConfigStore::new(
            "prod",
            props(&[
                ("project_id", "p1".into()),
                ("env", "prod".into()),
                ("dataset_name", "{project_id}_ds".into()),
            ]),
            true,
        )
        .with_env_source(MapEnv::new())
    }

    #[test]
    fn resolve_substitutes_placeholders_in_master() {
        let resolved = prod_store().resolve(Some("prod")).unwrap();

        assert_eq!(
            resolved.properties(),
            &props(&[
                ("dataset_name", "p1_ds".into()),
                ("env", "prod".into()),
                ("project_id", "p1".into()),
            ])
        );
        assert_eq!(resolved.environment(), "prod");
    }

    #[test]
    fn derived_environment_substitutes_with_its_own_values() {
        let mut store = prod_store();
        store.add_configuration("dev", props(&[("project_id", "p2".into())]));

        let dataset = store.resolve_property("dataset_name", Some("dev")).unwrap();
        assert_eq!(dataset.as_str(), Some("p2_ds"));

        // The master is untouched
        let dataset = store.resolve_property("dataset_name", Some("prod")).unwrap();
        assert_eq!(dataset.as_str(), Some("p1_ds"));
    }

    #[test]
    fn without_master_derived_environments_start_empty() {
        let mut store = ConfigStore::new("base", props(&[("a", "1".into())]), false)
            .with_env_source(MapEnv::new());
        store.add_configuration("other", props(&[("b", "2".into())]));

        assert_eq!(store.master_name(), None);
        let resolved = store.resolve(Some("other")).unwrap();
        assert!(!resolved.contains_key("a"));
        assert_eq!(resolved.get("b"), Some(&"2".into()));
    }

    #[test]
    fn default_environment_comes_from_prefixed_env_var() {
        let store = prod_store()
            .with_env_var_prefix("BQ_")
            .with_env_source(MapEnv::new().with_var("BQ_env", "prod"));

        let resolved = store.resolve(None).unwrap();
        assert_eq!(resolved.environment(), "prod");
    }

    #[test]
    fn empty_environment_name_uses_default_variable() {
        let env = MapEnv::new().with_var("env", "prod");
        let resolved = prod_store().resolve_with(Some(""), &env).unwrap();
        assert_eq!(resolved.environment(), "prod");

        let err = prod_store().resolve(Some("")).unwrap_err();
        assert!(matches!(err, Error::NoDefaultEnvironment { .. }));
    }

    #[test]
    fn default_environment_ignores_stored_env_property() {
        // "env" is a stored property of prod, but only the variable counts
        let err = prod_store().resolve(None).unwrap_err();
        match err {
            Error::NoDefaultEnvironment { env_var } => assert_eq!(env_var, "env"),
            other => panic!("expected NoDefaultEnvironment, got {other:?}"),
        }
    }

    #[test]
    fn unknown_environment_is_a_configuration_error() {
        let err = prod_store().resolve(Some("qa")).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(matches!(err, Error::UnknownEnvironment { ref name } if name == "qa"));
    }

    #[test]
    fn unknown_default_environment_reports_the_variable_value() {
        let env = MapEnv::new().with_var("env", "staging");
        let err = prod_store().resolve_with(None, &env).unwrap_err();
        assert!(matches!(err, Error::UnknownEnvironment { ref name } if name == "staging"));
    }

    #[test]
    fn absent_value_falls_back_to_env_var() {
        let store = ConfigStore::new(
            "prod",
            props(&[
                ("project_id", PropertyValue::Absent),
                ("dataset_name", "{project_id}_ds".into()),
            ]),
            true,
        )
        .with_env_var_prefix("APP_");

        let env = MapEnv::new().with_var("APP_project_id", "from-env");
        let resolved = store.resolve_with(Some("prod"), &env).unwrap();

        assert_eq!(resolved.get("project_id"), Some(&"from-env".into()));
        // Values read from the environment take part in substitution
        assert_eq!(resolved.get("dataset_name"), Some(&"from-env_ds".into()));
    }

    #[test]
    fn absent_value_without_env_var_names_key_and_variable() {
        let store = ConfigStore::new("prod", props(&[("token", PropertyValue::Absent)]), true)
            .with_env_var_prefix("APP_")
            .with_env_source(MapEnv::new());

        let err = store.resolve(Some("prod")).unwrap_err();
        assert!(err.is_configuration_error());
        match err {
            Error::MissingEnvVar { key, env_var } => {
                assert_eq!(key, "token");
                assert_eq!(env_var, "APP_token");
            }
            other => panic!("expected MissingEnvVar, got {other:?}"),
        }
    }

    #[test]
    fn non_string_values_pass_through() {
        let tables = PropertyValue::from(["{project_id}_t1"]);
        let opaque = PropertyValue::Other(serde_json::json!({"n": 1}));
        let store = ConfigStore::new(
            "prod",
            props(&[
                ("project_id", "p1".into()),
                ("tables", tables.clone()),
                ("opaque", opaque.clone()),
            ]),
            true,
        )
        .with_env_source(MapEnv::new());

        let resolved = store.resolve(Some("prod")).unwrap();
        assert_eq!(resolved.get("tables"), Some(&tables));
        assert_eq!(resolved.get("opaque"), Some(&opaque));
    }

    #[test]
    fn mutual_placeholders_resolve_in_one_pass() {
        let store = ConfigStore::new(
            "loop",
            props(&[("a", "{b}".into()), ("b", "{a}".into())]),
            true,
        )
        .with_env_source(MapEnv::new());

        let resolved = store.resolve(Some("loop")).unwrap();
        assert_eq!(resolved.get("a"), Some(&"{a}".into()));
        assert_eq!(resolved.get("b"), Some(&"{b}".into()));
    }

    #[test]
    fn overwriting_environment_drops_previous_overrides() {
        let mut store = prod_store();
        store
            .add_configuration("dev", props(&[("extra", "x".into())]))
            .add_configuration("dev", props(&[("project_id", "p2".into())]));

        let resolved = store.resolve(Some("dev")).unwrap();
        assert!(!resolved.contains_key("extra"));
        assert_eq!(resolved.get("project_id"), Some(&"p2".into()));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn derived_environment_snapshots_master_at_registration() {
        let mut store = prod_store();
        store.add_configuration("dev", Properties::new());
        store.add_configuration("prod", props(&[("project_id", "p9".into())]));

        // dev keeps the master values it was created from
        let project = store.resolve_property("project_id", Some("dev")).unwrap();
        assert_eq!(project.as_str(), Some("p1"));
    }

    #[test]
    fn resolve_property_reports_missing_key() {
        let err = prod_store()
            .resolve_property("nope", Some("prod"))
            .unwrap_err();
        assert!(!err.is_configuration_error());
        assert!(matches!(err, Error::KeyNotFound { ref key, .. } if key == "nope"));
    }

    #[test]
    fn resolve_is_deterministic() {
        let store = ConfigStore::new(
            "prod",
            props(&[
                ("a", "{b}-{c}".into()),
                ("b", "{c}".into()),
                ("c", "{a}".into()),
            ]),
            true,
        )
        .with_env_source(MapEnv::new());

        assert_eq!(
            store.resolve(Some("prod")).unwrap(),
            store.resolve(Some("prod")).unwrap()
        );
    }
}
