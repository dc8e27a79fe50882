//! Dataset-shaped configuration over envlayer-core
//!
//! [`DatasetConfig`] wraps a [`ConfigStore`](envlayer_core::ConfigStore)
//! and seeds every environment with five well-known keys:
//!
//! | key               | value                        |
//! |-------------------|------------------------------|
//! | `project_id`      | project identifier           |
//! | `env`             | environment name             |
//! | `dataset_name`    | dataset name                 |
//! | `internal_tables` | list of table names          |
//! | `external_tables` | table alias to table id map  |
//!
//! Everything else is an extra property. Resolution, inheritance and
//! placeholder substitution all happen in the store.
//!
//! # Example
//!
//! ```
//! use envlayer_core::MapEnv;
//! use envlayer_dataset::{DatasetConfig, DatasetProperties};
//!
//! let mut config = DatasetConfig::new(
//!     DatasetProperties::new("prod", "p1").dataset_name("{env}_dataset"),
//!     true,
//! )
//! .with_env_source(MapEnv::new());
//! config.add_configuration(DatasetProperties::new("dev", "p2"));
//!
//! assert_eq!(config.resolve_dataset_name(Some("dev")).unwrap(), "dev_dataset");
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod properties;

pub use config::DatasetConfig;
pub use error::{Error, Result};
pub use manager::{DatasetManagerFactory, DatasetManagerSpec};
pub use properties::{
    DATASET_NAME, DatasetProperties, ENV, EXTERNAL_TABLES, FIXED_KEYS, INTERNAL_TABLES, PROJECT_ID,
    UNSET_DATASET_NAME, is_extra_property,
};
