//! Hand-off point to the dataset manager
//!
//! The dataset manager itself lives outside this crate. All this crate
//! does is resolve its inputs and call a factory with them.

use envlayer_core::Properties;
use std::collections::BTreeMap;

/// Resolved inputs for constructing a dataset manager
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetManagerSpec {
    pub project_id: String,
    pub dataset_name: String,
    pub internal_tables: Vec<String>,
    /// Table alias to fully qualified table id
    pub external_tables: BTreeMap<String, String>,
    /// Every resolved property that is not one of the fixed keys
    pub extras: Properties,
}

/// Builds a dataset manager from resolved configuration
///
/// Any `Fn(DatasetManagerSpec) -> M` is a factory.
pub trait DatasetManagerFactory {
    type Manager;

    fn create(&self, spec: DatasetManagerSpec) -> Self::Manager;
}

impl<F, M> DatasetManagerFactory for F
where
    F: Fn(DatasetManagerSpec) -> M,
{
    type Manager = M;

    fn create(&self, spec: DatasetManagerSpec) -> M {
        self(spec)
    }
}
