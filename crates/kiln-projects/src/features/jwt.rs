use crate::assets;
use crate::error::Result;
use crate::features::INSTALLED_APPS;
use crate::pipeline::{Step, StepContext, StepStatus};
use crate::settings::{EditOutcome, ListTarget};
use kiln_core::ProjectConfig;
use tracing::{info, warn};

pub const JWT_AUTHENTICATION: &str = "rest_framework_simplejwt.authentication.JWTAuthentication";

const AUTHENTICATION_CLASSES: ListTarget<'static> = ListTarget::Key {
    setting: "REST_FRAMEWORK",
    key: "DEFAULT_AUTHENTICATION_CLASSES",
};
const BASIC_AUTHENTICATION: &str = "rest_framework.authentication.BasicAuthentication";

/// Token authentication on top of the API layer
pub struct JwtStep;

impl Step for JwtStep {
    fn name(&self) -> &'static str {
        "jwt"
    }

    fn enabled(&self, config: &ProjectConfig) -> bool {
        config.use_jwt
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepStatus> {
        ctx.installer.install(&["djangorestframework-simplejwt"])?;

        info!("Setting up jwt...");
        let mut settings = ctx.settings()?;
        settings
            .add_list_entry(INSTALLED_APPS, "rest_framework_simplejwt")?
            .require(INSTALLED_APPS, settings.path())?;

        let mut warnings = Vec::new();
        if settings.insert_list_entry_after(
            AUTHENTICATION_CLASSES,
            BASIC_AUTHENTICATION,
            JWT_AUTHENTICATION,
        )? == EditOutcome::AnchorMissing
        {
            let message = format!(
                "{} not found, JWT authentication class not registered",
                BASIC_AUTHENTICATION
            );
            warn!("{}", message);
            warnings.push(message);
        }

        settings.append_block_unless("SIMPLE_JWT =", &assets::raw("settings/simple_jwt.py")?);
        settings.save()?;

        if warnings.is_empty() {
            Ok(StepStatus::Applied)
        } else {
            Ok(StepStatus::Warned(warnings))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::RestFrameworkStep;
    use crate::packages::PackageInstaller;
    use crate::runner::RecordingRunner;
    use crate::test_support::{config, read, scaffold};

    #[test]
    fn test_jwt_after_rest_framework() {
        let (_temp, layout) = scaffold();
        let config = config();
        let runner = RecordingRunner::new();
        let installer = PackageInstaller::new(&runner, &layout, &config.packages);
        let ctx = StepContext::new(&config, &layout, &installer);

        RestFrameworkStep.apply(&ctx).unwrap();
        assert_eq!(JwtStep.apply(&ctx).unwrap(), StepStatus::Applied);

        let settings = read(layout.settings());
        assert!(settings.contains(&format!(
            "        '{}',\n        '{}',\n",
            BASIC_AUTHENTICATION, JWT_AUTHENTICATION
        )));
        assert!(settings.contains("    'rest_framework_simplejwt',\n"));
        assert!(settings.contains("'SIGNING_KEY': SECRET_KEY,"));
    }

    #[test]
    fn test_jwt_without_rest_framework_warns() {
        let (_temp, layout) = scaffold();
        let config = config();
        let runner = RecordingRunner::new();
        let installer = PackageInstaller::new(&runner, &layout, &config.packages);
        let ctx = StepContext::new(&config, &layout, &installer);

        let status = JwtStep.apply(&ctx).unwrap();

        assert!(matches!(status, StepStatus::Warned(_)));
        let settings = read(layout.settings());
        assert!(!settings.contains(JWT_AUTHENTICATION));
        assert!(settings.contains("SIMPLE_JWT = {"));
    }
}
