//! Error types for envlayer-core

/// Result type for envlayer-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while registering or resolving environments
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No environment name was given and the default variable is unset
    #[error(
        "No environment specified and no default available: environment variable '{env_var}' is not set"
    )]
    NoDefaultEnvironment { env_var: String },

    /// The requested environment was never registered
    #[error("No such environment: {name}")]
    UnknownEnvironment { name: String },

    /// An absent property could not be filled from the process environment
    #[error(
        "Failed to load property value '{key}' from the process environment, no such variable '{env_var}'"
    )]
    MissingEnvVar { key: String, env_var: String },

    /// A requested key is missing from the resolved properties
    #[error("Property '{key}' not found in environment '{environment}'")]
    KeyNotFound { key: String, environment: String },

    /// A store document is structurally inconsistent
    #[error("Invalid store document: {message}")]
    InvalidDocument { message: String },

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a configuration error, as opposed to a lookup
    /// of a key that simply does not exist.
    ///
    /// Missing default environment, unknown environment names, and unset
    /// env-var fallbacks all count as configuration errors.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::NoDefaultEnvironment { .. }
                | Self::UnknownEnvironment { .. }
                | Self::MissingEnvVar { .. }
        )
    }
}
