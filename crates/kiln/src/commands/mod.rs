//! Command implementations

pub mod ci;
pub mod configure;
pub mod env;
pub mod git;
pub mod validate;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use kiln_core::ProjectConfig;
use kiln_projects::ProjectLayout;

use crate::cli::GlobalOptions;
use crate::output;

/// Validated answers plus the project they apply to
pub struct Project {
    pub config: ProjectConfig,
    pub layout: ProjectLayout,
}

/// Load and validate the answers for the project directory
pub fn load_project(globals: &GlobalOptions) -> Result<Project> {
    let root = project_root(&globals.project_dir)?;
    let config = ProjectConfig::load(globals.config.as_deref(), &root)
        .context("Failed to load project answers")?;
    let layout = ProjectLayout::new(root, config.project_slug.clone());

    Ok(Project { config, layout })
}

pub fn project_root(dir: &Utf8Path) -> Result<Utf8PathBuf> {
    dir.canonicalize_utf8()
        .with_context(|| format!("Project directory not found: {}", dir))
}

/// Whether prompts may be shown
pub fn interactive(globals: &GlobalOptions) -> bool {
    !globals.non_interactive && console::Term::stderr().is_term()
}

/// Warn when an external tool the run depends on is not on `PATH`
pub fn check_tool(name: &str) -> bool {
    match which::which(name) {
        Ok(path) => {
            tracing::debug!("Found {} at {}", name, path.display());
            true
        }
        Err(_) => {
            output::warning(&format!("'{}' not found on PATH", name));
            false
        }
    }
}
