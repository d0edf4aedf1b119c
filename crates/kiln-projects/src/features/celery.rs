use crate::assets;
use crate::error::{Error, Result};
use crate::pipeline::{Step, StepContext, StepStatus};
use kiln_core::ProjectConfig;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use tracing::{debug, info};

/// Pinned task queue packages
pub const CELERY_PACKAGES: &[&str] = &["celery==5.2.3", "kombu==5.3.0b3"];

pub struct CeleryStep;

impl Step for CeleryStep {
    fn name(&self) -> &'static str {
        "celery"
    }

    fn enabled(&self, config: &ProjectConfig) -> bool {
        config.use_celery
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepStatus> {
        ctx.installer.install(CELERY_PACKAGES)?;

        info!("Setting up celery...");
        fs::write(
            ctx.layout.celery_module(),
            assets::render("celery.py.tera", &ctx.assets())?,
        )?;

        let init = ctx.layout.package_init();
        let existing = match fs::read_to_string(&init) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(Error::Io(e)),
        };
        if existing.contains("celery_app") {
            debug!("{} already exports celery_app", init);
        } else {
            let mut file = OpenOptions::new().create(true).append(true).open(&init)?;
            file.write_all(assets::raw("celery_init.py")?.as_bytes())?;
        }

        let mut settings = ctx.settings()?;
        settings.append_block_unless("CELERY_BROKER_URL", &assets::raw("settings/celery.py")?);
        settings.save()?;

        info!("Celery setup complete.");
        Ok(StepStatus::Applied)
    }
}
