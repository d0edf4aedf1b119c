use crate::assets;
use crate::error::Result;
use crate::features::INSTALLED_APPS;
use crate::pipeline::{Step, StepContext, StepStatus};
use kiln_core::ProjectConfig;
use tracing::info;

pub const REST_PACKAGES: &[&str] = &["djangorestframework", "django-filter", "drf-yasg"];

/// API layer: REST framework plus its schema browser
pub struct RestFrameworkStep;

impl Step for RestFrameworkStep {
    fn name(&self) -> &'static str {
        "rest_framework"
    }

    fn enabled(&self, config: &ProjectConfig) -> bool {
        config.use_rest_framework
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepStatus> {
        ctx.installer.install(REST_PACKAGES)?;

        info!("Setting up rest-framework...");
        let mut settings = ctx.settings()?;
        // head insertion, so the last one added ends up first
        for app in ["drf_yasg", "rest_framework"] {
            settings
                .add_list_entry(INSTALLED_APPS, app)?
                .require(INSTALLED_APPS, settings.path())?;
        }
        settings.append_block_unless(
            "REST_FRAMEWORK =",
            &assets::raw("settings/rest_framework.py")?,
        );
        settings.save()?;

        Ok(StepStatus::Applied)
    }
}
