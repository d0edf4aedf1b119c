//! Ordered feature pipeline
//!
//! A [`Pipeline`] is a list of named [`Step`]s run in a fixed order against one
//! generated project. Each step is gated by the (immutable) answers; the first
//! failing step stops the run and nothing already written is rolled back.

use crate::assets::AssetContext;
use crate::ci::{CiCredentials, CiVariablesStep};
use crate::docs::DocumentationStep;
use crate::error::Result;
use crate::env_file::EnvFileStep;
use crate::features::{
    CeleryStep, DatabaseStep, DockerStep, GraphqlStep, JwtStep, RestFrameworkStep, SentryStep,
    WhitenoiseStep,
};
use crate::layout::ProjectLayout;
use crate::packages::PackageInstaller;
use crate::precommit::PreCommitStep;
use crate::settings::SettingsDocument;
use kiln_core::ProjectConfig;
use tracing::{error, info};

/// Everything a step may read or drive
pub struct StepContext<'a> {
    pub config: &'a ProjectConfig,
    pub layout: &'a ProjectLayout,
    pub installer: &'a PackageInstaller<'a>,
}

impl<'a> StepContext<'a> {
    pub fn new(
        config: &'a ProjectConfig,
        layout: &'a ProjectLayout,
        installer: &'a PackageInstaller<'a>,
    ) -> Self {
        Self {
            config,
            layout,
            installer,
        }
    }

    pub fn assets(&self) -> AssetContext {
        AssetContext::new(self.layout.slug())
    }

    /// Load the project's settings module
    pub fn settings(&self) -> Result<SettingsDocument> {
        SettingsDocument::load(&self.layout.settings())
    }
}

/// How a step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Applied,
    /// Applied, with problems that did not stop the run
    Warned(Vec<String>),
    Skipped(String),
}

impl StepStatus {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Warned(_) => "applied with warnings",
            Self::Skipped(_) => "skipped",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Applied => String::new(),
            Self::Warned(warnings) => warnings.join("; "),
            Self::Skipped(reason) => reason.clone(),
        }
    }
}

/// One post-generation sub-routine
pub trait Step {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Whether the answers ask for this step at all
    fn enabled(&self, _config: &ProjectConfig) -> bool {
        true
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepStatus>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub name: &'static str,
    pub status: StepStatus,
}

/// Outcome of every step of a run, in order
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    records: Vec<StepRecord>,
}

impl PipelineReport {
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn status(&self, name: &str) -> Option<&StepStatus> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.status)
    }

    pub fn applied(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.records
            .iter()
            .filter(|r| !r.status.is_skipped())
            .map(|r| r.name)
    }

    fn push(&mut self, name: &'static str, status: StepStatus) {
        self.records.push(StepRecord { name, status });
    }
}

#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The post-generation run in its fixed order
    pub fn standard(credentials: CiCredentials) -> Self {
        Self::new()
            .with_step(DatabaseStep)
            .with_step(CeleryStep)
            .with_step(DockerStep)
            .with_step(SentryStep)
            .with_step(RestFrameworkStep)
            .with_step(GraphqlStep)
            .with_step(JwtStep)
            .with_step(DocumentationStep)
            .with_step(PreCommitStep)
            .with_step(EnvFileStep)
            .with_step(WhitenoiseStep)
            .with_step(CiVariablesStep::new(credentials))
    }

    pub fn with_step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Which steps would run for `config`, without running them
    pub fn plan(&self, config: &ProjectConfig) -> Vec<(&'static str, bool)> {
        self.steps
            .iter()
            .map(|s| (s.name(), s.enabled(config)))
            .collect()
    }

    /// Run every step in order, stopping at the first failure
    pub fn run(&self, ctx: &StepContext<'_>) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();

        for step in &self.steps {
            if !step.enabled(ctx.config) {
                report.push(step.name(), StepStatus::skipped("not selected"));
                continue;
            }

            info!("Running step: {}", step.name());
            let status = step.apply(ctx).inspect_err(|e| {
                error!("Step {} failed: {}", step.name(), e);
            })?;
            report.push(step.name(), status);
        }

        Ok(report)
    }
}
