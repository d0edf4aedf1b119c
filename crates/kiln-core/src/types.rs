//! Typed values carried by the project answers

use serde::{Deserialize, Deserializer, Serialize};

/// Project flavour, selects the documentation landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProjectType {
    /// Value-added service
    Vas,
    /// Notification service
    Notification,
    /// Anything else
    #[default]
    General,
}

impl ProjectType {
    /// Parse a project type label; unknown labels fall back to `General`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "VAS" => Self::Vas,
            "NOTIFICATION" => Self::Notification,
            _ => Self::General,
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vas => "VAS",
            Self::Notification => "NOTIFICATION",
            Self::General => "General",
        }
    }

    /// File name of the documentation template under `docs/templates`
    pub fn doc_template(&self) -> &'static str {
        match self {
            Self::Vas => "vas_template.md",
            Self::Notification => "notification_template.md",
            Self::General => "general_template.md",
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported database backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbType {
    PostgreSql,
    SqlServer,
    Sqlite,
    Oracle,
}

impl DbType {
    /// Get all supported database types
    pub fn all() -> [Self; 4] {
        [Self::PostgreSql, Self::SqlServer, Self::Sqlite, Self::Oracle]
    }

    /// Parse the label used in the answers file (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|db| db.label().to_lowercase() == normalized)
    }

    /// Label as written in the answers file
    pub fn label(&self) -> &'static str {
        match self {
            Self::PostgreSql => "PostgreSQL",
            Self::SqlServer => "SQL Server",
            Self::Sqlite => "SQLite",
            Self::Oracle => "Oracle",
        }
    }

    /// Django database engine identifier
    pub fn engine(&self) -> &'static str {
        match self {
            Self::PostgreSql => "django.db.backends.postgresql",
            Self::SqlServer => "sql_server.pyodbc",
            Self::Sqlite => "django.db.backends.sqlite3",
            Self::Oracle => "django.db.backends.oracle",
        }
    }

    /// Driver package to install, `None` for the embedded backend
    pub fn driver_package(&self) -> Option<&'static str> {
        match self {
            Self::PostgreSql => Some("psycopg2-binary"),
            Self::SqlServer => Some("pyodbc"),
            Self::Oracle => Some("cx_Oracle"),
            Self::Sqlite => None,
        }
    }

    /// Default listening port, `None` for the embedded backend
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::PostgreSql => Some(5432),
            Self::SqlServer => Some(1433),
            Self::Oracle => Some(1521),
            Self::Sqlite => None,
        }
    }
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Deployment target pushed to CI as variables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub server: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub port: String,
}

/// What to do when a version-control command fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitFailurePolicy {
    /// Log a warning and carry on with the rest of the run
    #[default]
    Warn,
    /// Propagate the failure and stop the run
    Abort,
}

/// Version-control settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitConfig {
    /// Branch created and pushed when missing on the remote
    #[serde(default = "default_develop_branch")]
    pub develop_branch: String,

    /// Remote name the repo link is registered under
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Message of the first commit
    #[serde(default = "default_initial_commit_message")]
    pub initial_commit_message: String,

    #[serde(default)]
    pub on_failure: GitFailurePolicy,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            develop_branch: default_develop_branch(),
            remote: default_remote(),
            initial_commit_message: default_initial_commit_message(),
            on_failure: GitFailurePolicy::default(),
        }
    }
}

fn default_develop_branch() -> String {
    "develop".to_string()
}
fn default_remote() -> String {
    "origin".to_string()
}
fn default_initial_commit_message() -> String {
    "Initial commit".to_string()
}

/// Package installer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackagesConfig {
    /// Interpreter used to bootstrap the virtualenv
    #[serde(default = "default_python")]
    pub python: String,

    /// Create `venv/` and install into it
    #[serde(default = "default_true", deserialize_with = "yes_no")]
    pub virtualenv: bool,

    /// Install `requirements.txt` before configuring features
    #[serde(default = "default_true", deserialize_with = "yes_no")]
    pub install_requirements: bool,

    /// Rewrite `requirements.txt` from `pip freeze` at the end of the run
    #[serde(default = "default_true", deserialize_with = "yes_no")]
    pub freeze_requirements: bool,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            virtualenv: true,
            install_requirements: true,
            freeze_requirements: true,
        }
    }
}

fn default_python() -> String {
    "python3".to_string()
}
fn default_true() -> bool {
    true
}

/// GitLab CI settings API access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CiConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            project_id: None,
            token: None,
        }
    }
}

fn default_api_url() -> String {
    "https://gitlab.com/api/v4".to_string()
}

/// Accept booleans as `true`/`false` or as the `y`/`n` answers of the
/// templating engine.
pub fn yes_no<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => Ok(b),
        Raw::Text(s) => parse_yes_no(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("expected y/n or true/false, got '{}'", s))
        }),
    }
}

/// Parse a y/n style answer
pub fn parse_yes_no(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" | "" => Some(false),
        _ => None,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}
