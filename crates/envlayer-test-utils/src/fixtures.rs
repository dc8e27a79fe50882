//! Property set and store fixtures.

use envlayer_core::{ConfigStore, MapEnv, Properties, PropertyValue};

/// Prefix used by [`sample_store`] for env-var names.
pub const SAMPLE_PREFIX: &str = "TEST_";

/// Build a property set from `(key, value)` pairs.
///
/// # Example
///
/// ```rust
/// use envlayer_test_utils::fixtures::props;
/// use envlayer_core::PropertyValue;
///
/// let p = props([("env", "dev".into()), ("token", PropertyValue::Absent)]);
/// assert_eq!(p.len(), 2);
/// ```
pub fn props<const N: usize>(entries: [(&str, PropertyValue); N]) -> Properties {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// An env source with the given `(name, value)` variables and nothing else.
pub fn env_with(vars: &[(&str, &str)]) -> MapEnv {
    vars.iter().copied().collect()
}

/// A store with master `prod` and derived `dev`, reading variables from an
/// empty [`MapEnv`].
///
/// - `prod`: `project_id = "p1"`, `env = "prod"`, `dataset_name = "{project_id}_ds"`
/// - `dev`: overrides `project_id = "p2"`, `env = "dev"`
pub fn sample_store() -> ConfigStore {
    let mut store = ConfigStore::new(
        "prod",
        props([
            ("project_id", "p1".into()),
            ("env", "prod".into()),
            ("dataset_name", "{project_id}_ds".into()),
        ]),
        true,
    )
    .with_env_var_prefix(SAMPLE_PREFIX)
    .with_env_source(MapEnv::new());

    store.add_configuration("dev", props([("project_id", "p2".into()), ("env", "dev".into())]));
    store
}
