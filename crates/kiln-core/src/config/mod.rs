//! Project answers and their loading

mod loader;

pub use loader::{find_config, CONFIG_FILE_NAMES};

use crate::types::{
    yes_no, CiConfig, DbType, DeploymentConfig, GitConfig, PackagesConfig, ProjectType,
};
use serde::{Deserialize, Serialize};

/// Answers collected once at generation time.
///
/// Immutable after loading: every step of the run borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Python package holding the settings module
    pub project_slug: String,

    #[serde(default = "default_project_type")]
    pub project_type: String,

    /// Database label; empty leaves the generated database settings alone
    #[serde(default)]
    pub db_type: String,

    #[serde(default, deserialize_with = "yes_no")]
    pub use_celery: bool,

    #[serde(default, deserialize_with = "yes_no")]
    pub use_redis: bool,

    #[serde(default, deserialize_with = "yes_no")]
    pub use_whitenoise: bool,

    #[serde(default, deserialize_with = "yes_no")]
    pub use_docker: bool,

    #[serde(default, deserialize_with = "yes_no")]
    pub use_rest_framework: bool,

    #[serde(default, deserialize_with = "yes_no")]
    pub use_graphql: bool,

    #[serde(default, deserialize_with = "yes_no")]
    pub use_jwt: bool,

    #[serde(default, deserialize_with = "yes_no")]
    pub use_sentry: bool,

    /// Remote the initial commit is pushed to
    #[serde(default)]
    pub repo_link: String,

    #[serde(default)]
    pub deployment: DeploymentConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub packages: PackagesConfig,

    #[serde(default)]
    pub ci: CiConfig,
}

fn default_project_type() -> String {
    "General".to_string()
}

impl ProjectConfig {
    /// Minimal answers for a project slug, every feature declined
    pub fn new(project_slug: impl Into<String>) -> Self {
        Self {
            project_slug: project_slug.into(),
            project_type: default_project_type(),
            db_type: String::new(),
            use_celery: false,
            use_redis: false,
            use_whitenoise: false,
            use_docker: false,
            use_rest_framework: false,
            use_graphql: false,
            use_jwt: false,
            use_sentry: false,
            repo_link: String::new(),
            deployment: DeploymentConfig::default(),
            git: GitConfig::default(),
            packages: PackagesConfig::default(),
            ci: CiConfig::default(),
        }
    }

    /// Selected database, `None` when empty or unrecognized
    pub fn database(&self) -> Option<DbType> {
        DbType::from_label(&self.db_type)
    }

    /// Selected project flavour
    pub fn project_type(&self) -> ProjectType {
        ProjectType::from_label(&self.project_type)
    }

    /// Whether a database was requested at all
    pub fn wants_database(&self) -> bool {
        !self.db_type.trim().is_empty()
    }
}
