//! Git command

use anyhow::Result;
use kiln_projects::git::{GitOutcome, RepositoryInitializer};
use kiln_projects::{CommandRunner, RecordingRunner, ShellRunner};

use crate::cli::GlobalOptions;
use crate::commands::{check_tool, load_project, Project};
use crate::output;

pub fn run(globals: &GlobalOptions) -> Result<()> {
    let project = load_project(globals)?;

    if globals.dry_run {
        let runner = RecordingRunner::new();
        initialize(&runner, &project)?;
        output::header("Commands that would run");
        for command in runner.commands() {
            println!("  {}", command);
        }
        return Ok(());
    }

    check_tool("git");
    let outcome = initialize(&ShellRunner::new(), &project)?;
    print_outcome(&outcome, &project);
    Ok(())
}

pub fn initialize(runner: &dyn CommandRunner, project: &Project) -> Result<GitOutcome> {
    let initializer = RepositoryInitializer::new(
        runner,
        project.layout.root(),
        &project.config.git,
    );
    Ok(initializer.initialize(&project.config.repo_link)?)
}

pub fn print_outcome(outcome: &GitOutcome, project: &Project) {
    let develop = &project.config.git.develop_branch;
    match outcome {
        GitOutcome::Committed => {
            output::success("Repository initialized");
            output::info("No repository link configured, nothing pushed");
        }
        GitOutcome::Pushed => output::success(&format!(
            "Pushed '{}' to {}",
            develop, project.config.repo_link
        )),
        GitOutcome::DevelopExists => output::info(&format!(
            "Branch '{}' already exists on the remote repository",
            develop
        )),
        GitOutcome::Failed { message } => {
            output::warning(&format!("Git setup did not complete: {}", message))
        }
    }
}
