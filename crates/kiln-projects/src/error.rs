//! Error types for kiln-projects

use thiserror::Error;

/// Result type alias using kiln-projects's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Post-generation error types
#[derive(Error, Debug)]
pub enum Error {
    /// External command exited non-zero
    #[error("Command failed: {command} ({}): {stderr}", describe_exit(.code))]
    CommandFailure {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Command could not be spawned at all
    #[error("Failed to execute '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Expected template or example file is absent
    #[error("{path} not found. Cannot create it from template.")]
    MissingTemplate { path: String },

    /// Environment file lacks a required key
    #[error("{key} not found in {path}. Please add it.")]
    MissingRequiredKey { key: String, path: String },

    /// Settings module lacks an anchor a mutation depends on
    #[error("Marker '{marker}' not found in {path}")]
    MissingMarker { marker: String, path: String },

    /// Settings module not found
    #[error("Settings file not found: {path}")]
    SettingsNotFound { path: String },

    /// Settings module could not be parsed as Python
    #[error("Failed to parse {path}: {message}")]
    SettingsParse { path: String, message: String },

    /// Database label outside the supported set
    #[error("Unknown database type: {db_type}. Supported: PostgreSQL, SQL Server, SQLite, Oracle")]
    UnknownDatabase { db_type: String },

    /// Embedded asset missing from the binary
    #[error("Embedded asset not found: {name}")]
    AssetNotFound { name: String },

    /// CI settings API rejected the request outright
    #[error("CI variable request failed: {message}")]
    CiVariable { message: String },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Template error from Tera
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),


    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] kiln_core::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl Error {
    /// Create a command failure error
    pub fn command_failure(
        command: impl Into<String>,
        code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailure {
            command: command.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Create a missing template error
    pub fn missing_template(path: impl Into<String>) -> Self {
        Self::MissingTemplate { path: path.into() }
    }

    /// Create a missing required key error
    pub fn missing_required_key(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self::MissingRequiredKey {
            key: key.into(),
            path: path.into(),
        }
    }

    /// Create a missing marker error
    pub fn missing_marker(marker: impl Into<String>, path: impl Into<String>) -> Self {
        Self::MissingMarker {
            marker: marker.into(),
            path: path.into(),
        }
    }

    /// Create a settings not found error
    pub fn settings_not_found(path: impl Into<String>) -> Self {
        Self::SettingsNotFound { path: path.into() }
    }

    /// Create a settings parse error
    pub fn settings_parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SettingsParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unknown database error
    pub fn unknown_database(db_type: impl Into<String>) -> Self {
        Self::UnknownDatabase {
            db_type: db_type.into(),
        }
    }

    /// Create an asset not found error
    pub fn asset_not_found(name: impl Into<String>) -> Self {
        Self::AssetNotFound { name: name.into() }
    }

    /// Create a CI variable error
    pub fn ci_variable(message: impl Into<String>) -> Self {
        Self::CiVariable {
            message: message.into(),
        }
    }
}
