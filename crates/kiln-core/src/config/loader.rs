//! Answers file loading and parsing
//!
//! Precedence (low to high):
//! 1. Serde defaults
//! 2. Answers file (`kiln.yaml`, searched upward from the project directory)
//! 3. Environment variables (`KILN_*` prefix)
//! 4. CLI flags (handled by caller)

use super::ProjectConfig;
use crate::error::{Error, Result};
use crate::types::parse_yes_no;
use crate::validate::{has_placeholder, validate_identifier};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use std::env;
use std::fs;
use tracing::debug;

/// Answers file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["kiln.yaml", "kiln.yml"];

/// Find the answers file in `start` or any of its parents
pub fn find_config(start: &Utf8Path) -> Result<Utf8PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                debug!("Found answers file at {}", path);
                return Ok(path);
            }
        }
        current = dir.parent();
    }

    Err(Error::config_not_found(format!(
        "kiln.yaml (searched {} and parent directories)",
        start
    )))
}

impl ProjectConfig {
    /// Load answers from the given path, or search upward from `project_dir`.
    ///
    /// Environment overrides are applied and the result is validated.
    pub fn load(path: Option<&Utf8Path>, project_dir: &Utf8Path) -> Result<Self> {
        let config = Self::load_unvalidated(path, project_dir)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`ProjectConfig::load`], but leaves validation to the caller
    pub fn load_unvalidated(path: Option<&Utf8Path>, project_dir: &Utf8Path) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_owned(),
            None => find_config(project_dir)?,
        };

        let content = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(config_path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        Self::from_yaml(&content)?.apply_env_overrides()
    }

    /// Parse answers from YAML (or JSON) text without validating
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Apply `KILN_*` environment variable overrides
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Ok(val) = env::var("KILN_PROJECT_SLUG") {
            self.project_slug = val;
        }
        if let Ok(val) = env::var("KILN_PROJECT_TYPE") {
            self.project_type = val;
        }
        if let Ok(val) = env::var("KILN_DB_TYPE") {
            self.db_type = val;
        }
        if let Ok(val) = env::var("KILN_REPO_LINK") {
            self.repo_link = val;
        }
        if let Ok(val) = env::var("KILN_PYTHON") {
            self.packages.python = val;
        }

        let flags: [(&str, &mut bool); 8] = [
            ("KILN_USE_CELERY", &mut self.use_celery),
            ("KILN_USE_REDIS", &mut self.use_redis),
            ("KILN_USE_WHITENOISE", &mut self.use_whitenoise),
            ("KILN_USE_DOCKER", &mut self.use_docker),
            ("KILN_USE_REST_FRAMEWORK", &mut self.use_rest_framework),
            ("KILN_USE_GRAPHQL", &mut self.use_graphql),
            ("KILN_USE_JWT", &mut self.use_jwt),
            ("KILN_USE_SENTRY", &mut self.use_sentry),
        ];
        for (name, flag) in flags {
            if let Ok(val) = env::var(name) {
                *flag = parse_yes_no(&val).ok_or_else(|| {
                    Error::invalid_config(format!("{} must be y/n or true/false", name))
                })?;
            }
        }

        if let Ok(val) = env::var("KILN_GITLAB_API_URL") {
            self.ci.api_url = val;
        }
        if let Ok(val) = env::var("KILN_GITLAB_PROJECT_ID") {
            self.ci.project_id = Some(val);
        }
        if let Ok(val) = env::var("KILN_GITLAB_TOKEN") {
            self.ci.token = Some(val);
        }

        Ok(self)
    }

    /// Reject answers the run cannot safely consume.
    ///
    /// Checks the slug is an identifier and that no string answer still holds
    /// an unrendered template variable.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.project_slug)?;

        let mut value = serde_json::to_value(self)?;
        if let Some(token) = &self.ci.token {
            // skipped by Serialize, still checked
            value["ci"]["token"] = Value::String(token.clone());
        }
        check_placeholders("", &value)
    }
}

fn check_placeholders(path: &str, value: &Value) -> Result<()> {
    match value {
        Value::String(s) if has_placeholder(s) => {
            Err(Error::unresolved_placeholder(path, s.as_str()))
        }
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                check_placeholders(&child_path, child)?;
            }
            Ok(())
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_placeholders(&format!("{}[{}]", path, i), item)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DbType, GitFailurePolicy, ProjectType};
    use serial_test::serial;
    use tempfile::TempDir;

    const ANSWERS: &str = r#"
project_slug: shop
project_type: VAS
db_type: PostgreSQL
use_celery: y
use_docker: "n"
use_rest_framework: true
use_jwt: "y"
repo_link: git@gitlab.com:acme/shop.git
deployment:
  user: deploy
  server: 10.0.0.5
  port: 22
git:
  on_failure: abort
"#;

    fn temp_dir() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("Invalid UTF-8 path");
        (temp, path)
    }

    #[test]
    fn test_from_yaml_parses_y_n_flags() {
        let config = ProjectConfig::from_yaml(ANSWERS).unwrap();
        assert_eq!(config.project_slug, "shop");
        assert_eq!(config.project_type(), ProjectType::Vas);
        assert_eq!(config.database(), Some(DbType::PostgreSql));
        assert!(config.use_celery);
        assert!(!config.use_docker);
        assert!(config.use_rest_framework);
        assert!(config.use_jwt);
        assert!(!config.use_graphql);
        assert_eq!(config.deployment.port, "22");
        assert_eq!(config.git.on_failure, GitFailurePolicy::Abort);
        assert_eq!(config.ci.api_url, "https://gitlab.com/api/v4");
    }

    #[test]
    fn test_from_json_answers() {
        let json = r#"{"project_slug": "shop", "db_type": "SQLite", "use_whitenoise": "y"}"#;
        let config = ProjectConfig::from_yaml(json).unwrap();
        assert_eq!(config.database(), Some(DbType::Sqlite));
        assert!(config.use_whitenoise);
    }

    #[test]
    fn test_validate_rejects_bad_slug() {
        let config = ProjectConfig::new("my-shop");
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unrendered_placeholder() {
        let mut config = ProjectConfig::new("shop");
        config.deployment.server = "{{ cookiecutter.deployment_server }}".to_string();

        match config.validate() {
            Err(Error::UnresolvedPlaceholder { field, .. }) => {
                assert_eq!(field, "deployment.server")
            }
            other => panic!("expected placeholder error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_checks_token() {
        let mut config = ProjectConfig::new("shop");
        config.ci.token = Some("{{ cookiecutter.token }}".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_load_searches_parent_directories() {
        let (_temp, root) = temp_dir();
        fs::write(root.join("kiln.yaml"), ANSWERS).unwrap();
        let nested = root.join("shop").join("settings");
        fs::create_dir_all(&nested).unwrap();

        let config = ProjectConfig::load(None, &nested).unwrap();
        assert_eq!(config.project_slug, "shop");
    }

    #[test]
    #[serial]
    fn test_load_missing_file() {
        let (_temp, root) = temp_dir();
        let result = ProjectConfig::load(Some(&root.join("nope.yaml")), &root);
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        env::set_var("KILN_DB_TYPE", "Oracle");
        env::set_var("KILN_USE_DOCKER", "y");
        env::set_var("KILN_GITLAB_TOKEN", "glpat-123");

        let config = ProjectConfig::from_yaml(ANSWERS)
            .unwrap()
            .apply_env_overrides()
            .unwrap();
        assert_eq!(config.database(), Some(DbType::Oracle));
        assert!(config.use_docker);
        assert_eq!(config.ci.token.as_deref(), Some("glpat-123"));

        env::remove_var("KILN_DB_TYPE");
        env::remove_var("KILN_USE_DOCKER");
        env::remove_var("KILN_GITLAB_TOKEN");
    }

    #[test]
    #[serial]
    fn test_env_override_rejects_bad_flag() {
        env::set_var("KILN_USE_JWT", "perhaps");
        let result = ProjectConfig::new("shop").apply_env_overrides();
        env::remove_var("KILN_USE_JWT");
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }
}
