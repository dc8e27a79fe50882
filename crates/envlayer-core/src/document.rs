//! JSON description of a whole store
//!
//! A store document lists the environments, which of them is the master,
//! and the env-var prefix:
//!
//! ```json
//! {
//!   "env_var_prefix": "APP_",
//!   "master": "prod",
//!   "environments": {
//!     "prod": { "project_id": "p1", "dataset_name": "{project_id}_ds", "token": null },
//!     "dev": { "project_id": "p2" }
//!   }
//! }
//! ```
//!
//! `null` values become [`PropertyValue::Absent`](crate::PropertyValue::Absent)
//! and are read from the environment at resolution time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::store::ConfigStore;
use crate::value::Properties;
use crate::{Error, Result};

/// Parsed store document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Prefix for env-var names
    #[serde(default)]
    pub env_var_prefix: String,

    /// Name of the master environment, if any
    #[serde(default)]
    pub master: Option<String>,

    /// Environment properties keyed by environment name
    ///
    /// Environments other than the master hold only their overrides.
    #[serde(default)]
    pub environments: BTreeMap<String, Properties>,
}

impl StoreDocument {
    /// Parse a store document from JSON content
    ///
    /// # Example
    ///
    /// ```
    /// use envlayer_core::StoreDocument;
    ///
    /// let doc = StoreDocument::parse(r#"{
    ///     "master": "prod",
    ///     "environments": { "prod": { "project_id": "p1" } }
    /// }"#).unwrap();
    ///
    /// assert_eq!(doc.master.as_deref(), Some("prod"));
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build a store from the document
    ///
    /// The master is registered first and every other environment is added
    /// on top of it. Without a master each environment keeps only its own
    /// properties.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDocument`] if there are no environments or the
    /// master is not one of them.
    pub fn into_store(mut self) -> Result<ConfigStore> {
        let (first_name, first_properties, is_master) = match self.master.take() {
            Some(master) => {
                let properties = self.environments.remove(&master).ok_or_else(|| {
                    Error::InvalidDocument {
                        message: format!("master environment '{master}' is not defined"),
                    }
                })?;
                (master, properties, true)
            }
            None => {
                let (name, properties) =
                    self.environments
                        .pop_first()
                        .ok_or_else(|| Error::InvalidDocument {
                            message: "no environments defined".to_string(),
                        })?;
                (name, properties, false)
            }
        };

        tracing::debug!(
            environments = self.environments.len() + 1,
            master = is_master.then_some(first_name.as_str()),
            "Building config store from document"
        );

        let mut store = ConfigStore::new(first_name, first_properties, is_master)
            .with_env_var_prefix(self.env_var_prefix);
        for (name, properties) in self.environments {
            store.add_configuration(name, properties);
        }
        Ok(store)
    }
}
