use crate::assets;
use crate::error::Result;
use crate::features::{write_if_absent, INSTALLED_APPS};
use crate::pipeline::{Step, StepContext, StepStatus};
use kiln_core::ProjectConfig;
use tracing::info;

/// Schema query layer backed by graphene
pub struct GraphqlStep;

impl Step for GraphqlStep {
    fn name(&self) -> &'static str {
        "graphql"
    }

    fn enabled(&self, config: &ProjectConfig) -> bool {
        config.use_graphql
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepStatus> {
        ctx.installer.install(&["graphene-django"])?;

        info!("Setting up django-graphene...");
        let mut settings = ctx.settings()?;
        settings
            .add_list_entry(INSTALLED_APPS, "graphene_django")?
            .require(INSTALLED_APPS, settings.path())?;
        settings.append_block_unless(
            "GRAPHENE =",
            &assets::render("settings/graphene.py.tera", &ctx.assets())?,
        );
        settings.save()?;

        write_if_absent(&ctx.layout.schema_module(), &assets::raw("schema.py")?)?;
        Ok(StepStatus::Applied)
    }
}
