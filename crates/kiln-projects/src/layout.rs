//! Paths inside a generated project

use camino::{Utf8Path, Utf8PathBuf};

/// Well-known locations of a generated project, rooted at the directory that
/// holds `manage.py`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: Utf8PathBuf,
    slug: String,
}

impl ProjectLayout {
    pub fn new(root: impl Into<Utf8PathBuf>, slug: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            slug: slug.into(),
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Python package named after the project slug
    pub fn package_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.slug)
    }

    pub fn settings(&self) -> Utf8PathBuf {
        self.package_dir().join("settings.py")
    }

    pub fn package_init(&self) -> Utf8PathBuf {
        self.package_dir().join("__init__.py")
    }

    pub fn celery_module(&self) -> Utf8PathBuf {
        self.package_dir().join("celery.py")
    }

    pub fn schema_module(&self) -> Utf8PathBuf {
        self.package_dir().join("schema.py")
    }

    /// Project-level templates directory (`BASE_DIR / 'templates'`)
    pub fn templates_dir(&self) -> Utf8PathBuf {
        self.root.join("templates")
    }

    pub fn env_file(&self) -> Utf8PathBuf {
        self.root.join(".env")
    }

    pub fn env_example(&self) -> Utf8PathBuf {
        self.root.join(".env.example")
    }

    pub fn dockerfile(&self) -> Utf8PathBuf {
        self.root.join("Dockerfile")
    }

    pub fn compose_file(&self) -> Utf8PathBuf {
        self.root.join("docker-compose.yml")
    }

    pub fn dockerignore(&self) -> Utf8PathBuf {
        self.root.join(".dockerignore")
    }

    pub fn docker_dir(&self) -> Utf8PathBuf {
        self.root.join("docker")
    }

    pub fn docs_dir(&self) -> Utf8PathBuf {
        self.root.join("docs")
    }

    pub fn doc_templates_dir(&self) -> Utf8PathBuf {
        self.docs_dir().join("templates")
    }

    pub fn pre_commit_config(&self) -> Utf8PathBuf {
        self.root.join(".pre-commit-config.yaml")
    }

    pub fn requirements(&self) -> Utf8PathBuf {
        self.root.join("requirements.txt")
    }

    pub fn venv_dir(&self) -> Utf8PathBuf {
        self.root.join("venv")
    }

    /// Interpreter inside the project virtualenv
    pub fn venv_python(&self) -> Utf8PathBuf {
        if cfg!(windows) {
            self.venv_dir().join("Scripts").join("python.exe")
        } else {
            self.venv_dir().join("bin").join("python")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = ProjectLayout::new("/work/shop", "shop");
        assert_eq!(layout.settings(), Utf8PathBuf::from("/work/shop/shop/settings.py"));
        assert_eq!(layout.env_file(), Utf8PathBuf::from("/work/shop/.env"));
        assert_eq!(layout.templates_dir(), Utf8PathBuf::from("/work/shop/templates"));
        assert_eq!(
            layout.doc_templates_dir(),
            Utf8PathBuf::from("/work/shop/docs/templates")
        );
    }
}
