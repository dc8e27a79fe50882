//! Layered environment configuration for envlayer
//!
//! This crate provides the resolution engine behind envlayer:
//!
//! - **Environments**: named property sets, optionally derived from a master
//! - **Env-var fallback**: unset values are read from `<prefix><key>`
//! - **Placeholders**: `{key}` tokens in string values are substituted from
//!   the other string values of the same environment
//!
//! # Example
//!
//! ```
//! use envlayer_core::{ConfigStore, MapEnv, Properties, PropertyValue};
//!
//! let mut prod = Properties::new();
//! prod.insert("project_id".to_string(), "p1".into());
//! prod.insert("dataset_name".to_string(), "{project_id}_ds".into());
//!
//! let mut dev = Properties::new();
//! dev.insert("project_id".to_string(), "p2".into());
//!
//! let mut store = ConfigStore::new("prod", prod, true).with_env_source(MapEnv::new());
//! store.add_configuration("dev", dev);
//!
//! let resolved = store.resolve(Some("dev")).unwrap();
//! assert_eq!(resolved.get("dataset_name"), Some(&PropertyValue::from("p2_ds")));
//! ```

pub mod document;
pub mod env;
pub mod error;
pub mod placeholder;
pub mod resolved;
pub mod store;
pub mod value;

pub use document::StoreDocument;
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::{Error, Result};
pub use resolved::ResolvedProperties;
pub use store::{ConfigStore, DEFAULT_ENV_KEY, EnvironmentProperties};
pub use value::{Properties, PropertyValue};
