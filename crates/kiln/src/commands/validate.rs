//! Validate command

use anyhow::Result;
use kiln_core::{validate_identifier, ProjectConfig};

use crate::cli::{GlobalOptions, ValidateArgs};
use crate::commands::project_root;
use crate::output;

pub fn run(args: ValidateArgs, globals: &GlobalOptions) -> Result<()> {
    let name = match args.name {
        Some(name) => name,
        None => {
            let root = project_root(&globals.project_dir)?;
            ProjectConfig::load_unvalidated(globals.config.as_deref(), &root)?.project_slug
        }
    };

    if let Err(e) = validate_identifier(&name) {
        output::error(&format!("ERROR: {}", e));
        std::process::exit(1);
    }

    output::success(&format!("'{}' is a valid Python identifier", name));
    Ok(())
}
