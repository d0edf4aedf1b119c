//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// kiln - finish a generated Django backend skeleton
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the kiln.yaml answers file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Root of the generated project
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub project_dir: Utf8PathBuf,

    /// Show what would be done without changing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Never prompt, even on a terminal
    #[arg(long, global = true, env = "KILN_NON_INTERACTIVE")]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn globals(&self) -> GlobalOptions {
        GlobalOptions {
            config: self.config.clone(),
            project_dir: self.project_dir.clone(),
            dry_run: self.dry_run,
            non_interactive: self.non_interactive,
        }
    }
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub config: Option<Utf8PathBuf>,
    pub project_dir: Utf8PathBuf,
    pub dry_run: bool,
    pub non_interactive: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the project name is a valid Python identifier
    Validate(ValidateArgs),

    /// Run the full post-generation setup
    Configure(ConfigureArgs),

    /// Create or verify the .env file
    Env,

    /// Initialize the git repository and push the develop branch
    Git,

    /// Push deployment variables to GitLab CI
    CiVars(CiVarsArgs),
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Name to check instead of the configured project slug
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Skip virtualenv creation, requirement installs and the final freeze
    #[arg(long)]
    pub skip_install: bool,

    /// Skip repository initialization
    #[arg(long)]
    pub skip_git: bool,
}

#[derive(Args, Debug)]
pub struct CiVarsArgs {
    /// GitLab project id (or `manual` to skip)
    #[arg(long)]
    pub project_id: Option<String>,

    /// GitLab personal access token (or `cancel` to skip)
    #[arg(long, env = "KILN_GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}
