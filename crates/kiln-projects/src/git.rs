//! Repository initialization and first push

use crate::error::{Error, Result};
use crate::runner::{quote, CommandRunner};
use camino::Utf8Path;
use kiln_core::{GitConfig, GitFailurePolicy};
use tracing::{debug, info, warn};

/// How the repository initializer ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOutcome {
    /// Committed locally, no remote configured
    Committed,
    /// The develop branch was created and pushed
    Pushed,
    /// The remote already has a develop branch
    DevelopExists,
    /// A git command failed and the failure policy is `warn`
    Failed { message: String },
}

/// Runs `git init`, the initial commit and the develop branch push
pub struct RepositoryInitializer<'a> {
    runner: &'a dyn CommandRunner,
    root: &'a Utf8Path,
    config: &'a GitConfig,
}

impl<'a> RepositoryInitializer<'a> {
    pub fn new(runner: &'a dyn CommandRunner, root: &'a Utf8Path, config: &'a GitConfig) -> Self {
        Self {
            runner,
            root,
            config,
        }
    }

    /// Initialize the repository and push the develop branch to `repo_link`.
    ///
    /// An empty `repo_link` stops after the initial commit.
    ///
    /// # Errors
    /// With `on_failure: abort` the first failing git command is returned as
    /// [`Error::CommandFailure`]; with `warn` it is logged and reported as
    /// [`GitOutcome::Failed`].
    pub fn initialize(&self, repo_link: &str) -> Result<GitOutcome> {
        match self.run_sequence(repo_link) {
            Ok(outcome) => Ok(outcome),
            Err(e @ (Error::CommandFailure { .. } | Error::Spawn { .. }))
                if self.config.on_failure == GitFailurePolicy::Warn =>
            {
                warn!("Git setup did not complete: {}", e);
                Ok(GitOutcome::Failed {
                    message: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Whether `<remote>/<branch>` is listed by `git branch -r`
    pub fn branch_exists(&self, branch: &str) -> Result<bool> {
        let wanted = format!("{}/{}", self.config.remote, branch);
        let listing = self.git("branch -r")?;
        Ok(listing.lines().any(|line| line.trim() == wanted))
    }

    fn run_sequence(&self, repo_link: &str) -> Result<GitOutcome> {
        info!("Initializing git repository...");
        self.git("init")?;
        self.git("add .")?;
        self.git(&format!(
            "commit -m {}",
            quote(&self.config.initial_commit_message)
        ))?;

        let repo_link = repo_link.trim();
        if repo_link.is_empty() {
            info!("No repository link provided, skipping remote setup");
            return Ok(GitOutcome::Committed);
        }

        self.git(&format!(
            "remote add {} {}",
            quote(&self.config.remote),
            quote(repo_link)
        ))?;

        let develop = &self.config.develop_branch;
        if self.branch_exists(develop)? {
            info!("Branch '{}' already exists on the remote repository.", develop);
            return Ok(GitOutcome::DevelopExists);
        }

        self.git(&format!("checkout -b {}", quote(develop)))?;
        self.git(&format!(
            "push -u {} {}",
            quote(&self.config.remote),
            quote(develop)
        ))?;

        info!("Pushed '{}' to {}", develop, repo_link);
        Ok(GitOutcome::Pushed)
    }

    fn git(&self, args: &str) -> Result<String> {
        debug!("git {}", args);
        self.runner.run(&format!("git {}", args), self.root)
    }
}
