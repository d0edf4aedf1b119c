//! Default pre-commit configuration

use crate::assets;
use crate::error::Result;
use crate::features::write_if_absent;
use crate::pipeline::{Step, StepContext, StepStatus};
use tracing::info;

pub struct PreCommitStep;

impl Step for PreCommitStep {
    fn name(&self) -> &'static str {
        "pre-commit"
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepStatus> {
        let path = ctx.layout.pre_commit_config();
        if write_if_absent(&path, &assets::raw("pre-commit-config.yaml")?)? {
            info!("Wrote default {}", path);
            Ok(StepStatus::Applied)
        } else {
            Ok(StepStatus::skipped("configuration already present"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::PackageInstaller;
    use crate::runner::RecordingRunner;
    use crate::test_support::{config, read, scaffold};
    use std::fs;

    #[test]
    fn test_written_only_when_absent() {
        let (_temp, layout) = scaffold();
        let config = config();
        let runner = RecordingRunner::new();
        let installer = PackageInstaller::new(&runner, &layout, &config.packages);
        let ctx = StepContext::new(&config, &layout, &installer);

        assert_eq!(PreCommitStep.apply(&ctx).unwrap(), StepStatus::Applied);
        assert!(read(layout.pre_commit_config()).contains("repos:"));

        fs::write(layout.pre_commit_config(), "repos: []\n").unwrap();
        assert!(PreCommitStep.apply(&ctx).unwrap().is_skipped());
        assert_eq!(read(layout.pre_commit_config()), "repos: []\n");
    }
}
