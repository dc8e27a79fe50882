//! Error types for envlayer-dataset

/// Result type for envlayer-dataset operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in envlayer-dataset operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A well-known key resolved to the wrong kind of value
    #[error("Property '{key}' should be a {expected}, found {found}")]
    UnexpectedType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Resolution error from envlayer-core
    #[error(transparent)]
    Core(#[from] envlayer_core::Error),
}
