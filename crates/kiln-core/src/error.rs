//! Error types for kiln-core

use thiserror::Error;

/// Result type alias using kiln-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for kiln
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Project slug is not usable as a Python package name
    #[error("The project name '{name}' is not a valid Python identifier.")]
    InvalidIdentifier { name: String },

    /// A template variable was never rendered
    #[error("Unresolved template placeholder in '{field}': {value}")]
    UnresolvedPlaceholder { field: String, value: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON conversion error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into() }
    }

    /// Create an unresolved placeholder error
    pub fn unresolved_placeholder(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnresolvedPlaceholder {
            field: field.into(),
            value: value.into(),
        }
    }
}
