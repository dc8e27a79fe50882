//! End-to-end integration tests
//!
//! These exercise the complete flow: store document -> store -> resolution,
//! and dataset facade -> dataset manager, against both fake and real
//! process environments.

use envlayer_core::{ConfigStore, Error, ProcessEnv, PropertyValue, StoreDocument};
use envlayer_dataset::{DatasetConfig, DatasetManagerSpec, DatasetProperties};
use envlayer_test_utils::fixtures::{env_with, props};
use envlayer_test_utils::logging::init_test_logging;
use pretty_assertions::assert_eq;

/// The document a deployment would ship next to the binary
const DEPLOYMENT: &str = r#"{
    "env_var_prefix": "DEPLOY_",
    "master": "prod",
    "environments": {
        "prod": {
            "project_id": "acme-prod",
            "env": "prod",
            "dataset_name": "{env}_warehouse",
            "service_account": "loader@{project_id}.iam",
            "api_token": null,
            "tables": ["orders", "customers"]
        },
        "staging": { "project_id": "acme-staging", "env": "staging" },
        "local": { "project_id": "acme-local", "env": "local", "api_token": "dev-token" }
    }
}"#;

#[test]
fn test_deployment_document_resolves_each_environment() {
    init_test_logging();
    let store = StoreDocument::parse(DEPLOYMENT)
        .unwrap()
        .into_store()
        .unwrap();

    let env = env_with(&[("DEPLOY_env", "staging"), ("DEPLOY_api_token", "s3cret")]);
    let staging = store.resolve_with(None, &env).unwrap();

    assert_eq!(
        staging.to_json(),
        serde_json::json!({
            "project_id": "acme-staging",
            "env": "staging",
            "dataset_name": "staging_warehouse",
            "service_account": "loader@acme-staging.iam",
            "api_token": "s3cret",
            "tables": ["orders", "customers"]
        })
    );

    // local supplies its own token, so no variable is needed
    let local = store.resolve_with(Some("local"), &env_with(&[])).unwrap();
    assert_eq!(local.get("api_token"), Some(&PropertyValue::from("dev-token")));

    // prod still needs it
    let err = store.resolve_with(Some("prod"), &env_with(&[])).unwrap_err();
    assert!(matches!(err, Error::MissingEnvVar { ref key, .. } if key == "api_token"));
}

#[test]
fn test_process_environment_is_the_default_source() {
    // cargo sets CARGO_PKG_NAME for test processes
    let store = ConfigStore::new(
        "build",
        props([
            ("NAME", PropertyValue::Absent),
            ("label", "pkg:{NAME}".into()),
        ]),
        true,
    )
    .with_env_var_prefix("CARGO_PKG_");

    let resolved = store.resolve(Some("build")).unwrap();
    let expected = format!("pkg:{}", env!("CARGO_PKG_NAME"));
    assert_eq!(resolved.get("label"), Some(&PropertyValue::from(expected)));

    // CARGO_PKG_env is never set, so there is no default environment
    let err = store.resolve_with(None, &ProcessEnv).unwrap_err();
    assert!(matches!(
        err,
        Error::NoDefaultEnvironment { ref env_var } if env_var == "CARGO_PKG_env"
    ));
}

#[test]
fn test_dataset_facade_end_to_end() {
    let mut config = DatasetConfig::new(
        DatasetProperties::new("prod", "acme-prod")
            .dataset_name("{env}_warehouse")
            .internal_tables(["orders"])
            .external_tables([("fx", "shared.finance.fx_rates")])
            .property("location", "EU")
            .property("api_token", PropertyValue::Absent),
        true,
    )
    .with_env_var_prefix("DEPLOY_")
    .with_env_source(env_with(&[("DEPLOY_env", "staging"), ("DEPLOY_api_token", "t")]));
    config.add_configuration(DatasetProperties::new("staging", "acme-staging"));

    let spec = config
        .create_dataset_manager(None, &|spec: DatasetManagerSpec| spec)
        .unwrap();

    assert_eq!(spec.project_id, "acme-staging");
    assert_eq!(spec.dataset_name, "staging_warehouse");
    assert_eq!(spec.internal_tables, vec!["orders"]);
    assert_eq!(spec.external_tables["fx"], "shared.finance.fx_rates");
    assert_eq!(
        spec.extras,
        props([
            ("api_token", "t".into()),
            ("location", "EU".into()),
        ])
    );
}
