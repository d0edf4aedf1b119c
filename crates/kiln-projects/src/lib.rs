//! # kiln-projects
//!
//! Post-generation library for the kiln CLI providing:
//! - Shell command execution behind a swappable runner
//! - Structured edits of the generated settings module
//! - Optional feature wiring (database, task queue, containers, API layers, ...)
//! - Environment file materialization and verification
//! - Git repository initialization and CI variable provisioning
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use kiln_core::ProjectConfig;
//! use kiln_projects::ci::CiCredentials;
//! use kiln_projects::layout::ProjectLayout;
//! use kiln_projects::packages::PackageInstaller;
//! use kiln_projects::pipeline::{Pipeline, StepContext};
//! use kiln_projects::runner::ShellRunner;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let root = Utf8Path::new("/work/shop");
//! let config = ProjectConfig::load(None, root)?;
//! let layout = ProjectLayout::new(root, config.project_slug.clone());
//!
//! let runner = ShellRunner::new();
//! let installer = PackageInstaller::new(&runner, &layout, &config.packages);
//! let ctx = StepContext::new(&config, &layout, &installer);
//!
//! let report = Pipeline::standard(CiCredentials::from_config(&config.ci)).run(&ctx)?;
//! for record in report.records() {
//!     println!("{}: {}", record.name, record.status.label());
//! }
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod ci;
pub mod docs;
pub mod env_file;
pub mod error;
pub mod features;
pub mod git;
pub mod layout;
pub mod packages;
pub mod pipeline;
pub mod precommit;
pub mod runner;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, Result};
pub use layout::ProjectLayout;
pub use pipeline::{Pipeline, PipelineReport, Step, StepContext, StepStatus};
pub use runner::{CommandRunner, RecordingRunner, ShellRunner};
