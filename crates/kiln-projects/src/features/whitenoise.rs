use crate::error::Result;
use crate::features::{MIDDLEWARE, SECURITY_MIDDLEWARE};
use crate::pipeline::{Step, StepContext, StepStatus};
use crate::settings::EditOutcome;
use kiln_core::ProjectConfig;
use std::fs;
use tracing::{info, warn};

pub const WHITENOISE_MIDDLEWARE: &str = "whitenoise.middleware.WhiteNoiseMiddleware";

const STATIC_ROOT: &str = "\nSTATIC_ROOT = BASE_DIR / 'staticfiles'\n";
const EMPTY_TEMPLATE_DIRS: &str = "'DIRS': [],";
const PROJECT_TEMPLATE_DIRS: &str = "'DIRS': [BASE_DIR / 'templates'],";

/// Static-asset middleware plus the project templates directory
pub struct WhitenoiseStep;

impl Step for WhitenoiseStep {
    fn name(&self) -> &'static str {
        "whitenoise"
    }

    fn enabled(&self, config: &ProjectConfig) -> bool {
        config.use_whitenoise
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepStatus> {
        let mut settings = ctx.settings()?;
        settings
            .insert_list_entry_after(MIDDLEWARE, SECURITY_MIDDLEWARE, WHITENOISE_MIDDLEWARE)?
            .require(SECURITY_MIDDLEWARE, settings.path())?;
        settings.append_block_unless("STATIC_ROOT", STATIC_ROOT);
        info!("Whitenoise middleware and STATIC_ROOT added to settings.py.");

        let templates = ctx.layout.templates_dir();
        if !templates.exists() {
            fs::create_dir_all(&templates)?;
            info!("Created templates directory at: {}", templates);
        }

        let mut warnings = Vec::new();
        if settings.replace_literal(EMPTY_TEMPLATE_DIRS, PROJECT_TEMPLATE_DIRS)
            == EditOutcome::AnchorMissing
        {
            let message = "TEMPLATES has no empty 'DIRS' list, left unchanged".to_string();
            warn!("{}", message);
            warnings.push(message);
        }
        settings.save()?;

        if warnings.is_empty() {
            Ok(StepStatus::Applied)
        } else {
            Ok(StepStatus::Warned(warnings))
        }
    }
}
