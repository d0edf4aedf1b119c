use crate::assets;
use crate::error::Result;
use crate::features::{MIDDLEWARE, SECURITY_MIDDLEWARE};
use crate::pipeline::{Step, StepContext, StepStatus};
use kiln_core::ProjectConfig;
use tracing::info;

/// Integration reference placed in `MIDDLEWARE`
pub const SENTRY_INTEGRATION: &str = "sentry_sdk.integrations.django.DjangoIntegration";

/// Error reporting.
///
/// The `sentry_sdk.init(...)` block is appended on every application, so
/// running the step twice leaves two init blocks. The middleware entry is only
/// inserted once.
pub struct SentryStep;

impl Step for SentryStep {
    fn name(&self) -> &'static str {
        "sentry"
    }

    fn enabled(&self, config: &ProjectConfig) -> bool {
        config.use_sentry
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepStatus> {
        ctx.installer.install(&["sentry-sdk"])?;

        info!("Setting up sentry...");
        let mut settings = ctx.settings()?;
        settings
            .insert_list_entry_after(MIDDLEWARE, SECURITY_MIDDLEWARE, SENTRY_INTEGRATION)?
            .require(SECURITY_MIDDLEWARE, settings.path())?;
        settings.append_block(&assets::raw("settings/sentry.py")?);
        settings.save()?;

        Ok(StepStatus::Applied)
    }
}
