//! Environment file command

use anyhow::{Context, Result};
use kiln_projects::env_file::{self, EnvOptions, EnvStatus};

use crate::cli::GlobalOptions;
use crate::commands::load_project;
use crate::output;

pub fn run(globals: &GlobalOptions) -> Result<()> {
    let project = load_project(globals)?;
    let layout = &project.layout;

    if globals.dry_run {
        if layout.env_file().exists() {
            output::info(&format!("{} exists and would be verified", layout.env_file()));
        } else {
            output::info(&format!(
                "{} would be created from {}",
                layout.env_file(),
                layout.env_example()
            ));
        }
        return Ok(());
    }

    let options = EnvOptions::from_config(&project.config);
    let status = env_file::ensure_env_file(layout, &options)
        .with_context(|| format!("Environment file check failed for {}", layout.env_file()))?;

    match status {
        EnvStatus::Created => output::success(&format!("Created {}", layout.env_file())),
        EnvStatus::AlreadyPresent => {
            output::success(&format!("{} contains the required keys", layout.env_file()))
        }
    }
    Ok(())
}
