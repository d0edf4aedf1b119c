//! Configure command: the full post-generation run

use anyhow::{Context, Result};
use kiln_projects::ci::CiCredentials;
use kiln_projects::packages::PackageInstaller;
use kiln_projects::{Pipeline, ShellRunner, StepContext};

use crate::cli::{ConfigureArgs, GlobalOptions};
use crate::commands::ci::resolve_credentials;
use crate::commands::{check_tool, git, interactive, load_project};
use crate::output;

pub fn run(args: ConfigureArgs, globals: &GlobalOptions) -> Result<()> {
    let project = load_project(globals)?;
    let config = &project.config;
    let layout = &project.layout;

    output::header(&format!("Configuring {}", config.project_slug));
    output::kv("Project", layout.root().as_str());
    output::kv("Type", config.project_type().as_str());
    output::kv(
        "Database",
        if config.db_type.is_empty() {
            "unchanged"
        } else {
            config.db_type.as_str()
        },
    );

    if globals.dry_run {
        let pipeline = Pipeline::standard(CiCredentials::from_config(&config.ci));
        output::header("Planned steps");
        output::plan(&pipeline.plan(config));
        return Ok(());
    }

    if !args.skip_install {
        check_tool(&config.packages.python);
    }
    if !args.skip_git {
        check_tool("git");
    }

    let runner = ShellRunner::new();
    let mut installer = PackageInstaller::new(&runner, layout, &config.packages);

    if !args.skip_install {
        installer
            .create_virtualenv()
            .context("Error creating virtual environment")?;
        if config.packages.install_requirements {
            installer.install_requirements()?;
        }
    }

    let credentials = resolve_credentials(&config.ci, None, None, interactive(globals))?;
    let pipeline = Pipeline::standard(credentials);

    let ctx = StepContext::new(config, layout, &installer);
    let report = pipeline
        .run(&ctx)
        .context("Project setup stopped")?;

    output::header("Steps");
    output::report(&report);

    if !args.skip_git {
        let outcome = git::initialize(&runner, &project)?;
        git::print_outcome(&outcome, &project);
    }

    if !args.skip_install && config.packages.freeze_requirements {
        installer.freeze_requirements()?;
        output::success("Requirements updated and pre-commit hooks installed");
    }

    output::success("Project setup complete!");
    Ok(())
}
