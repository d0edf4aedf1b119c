use crate::assets;
use crate::error::{Error, Result};
use crate::pipeline::{Step, StepContext, StepStatus};
use kiln_core::{DbType, ProjectConfig};
use tracing::info;

/// Replaces the generated `DATABASES` block with the selected backend's
pub struct DatabaseStep;

impl Step for DatabaseStep {
    fn name(&self) -> &'static str {
        "database"
    }

    fn enabled(&self, config: &ProjectConfig) -> bool {
        config.wants_database()
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepStatus> {
        let db = ctx
            .config
            .database()
            .ok_or_else(|| Error::unknown_database(ctx.config.db_type.trim()))?;
        configure_database(ctx, db)?;
        Ok(StepStatus::Applied)
    }
}

/// `DATABASES = {...}` assignment for a backend
pub fn database_block(db: DbType) -> Result<String> {
    let name = match db {
        DbType::PostgreSql => "postgresql",
        DbType::SqlServer => "sqlserver",
        DbType::Sqlite => "sqlite",
        DbType::Oracle => "oracle",
    };
    assets::raw(&format!("settings/databases/{}.py", name))
}

/// Install the driver and rewrite `DATABASES` for `db`
pub fn configure_database(ctx: &StepContext<'_>, db: DbType) -> Result<()> {
    info!("Configuring {} database...", db);

    if let Some(driver) = db.driver_package() {
        ctx.installer.install(&[driver])?;
    }

    let mut settings = ctx.settings()?;
    settings
        .replace_assignment("DATABASES", &database_block(db)?)?
        .require("DATABASES", settings.path())?;
    settings.save()?;

    info!("Database configuration updated for {}", db);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::PackageInstaller;
    use crate::runner::RecordingRunner;
    use crate::test_support::{config, read, scaffold};
    use std::fs;

    #[test]
    fn test_every_backend_engine_appears_once() {
        for db in DbType::all() {
            let (_temp, layout) = scaffold();
            let mut config = config();
            config.db_type = db.label().to_string();
            let runner = RecordingRunner::new();
            let installer = PackageInstaller::new(&runner, &layout, &config.packages);
            let ctx = StepContext::new(&config, &layout, &installer);

            DatabaseStep.apply(&ctx).unwrap();

            let settings = read(layout.settings());
            assert_eq!(settings.matches(db.engine()).count(), 1, "{}", db);
            assert_eq!(settings.matches("DATABASES = {").count(), 1, "{}", db);
            assert!(settings.contains("AUTH_PASSWORD_VALIDATORS = ["));

            match db.driver_package() {
                Some(driver) => assert_eq!(
                    runner.commands(),
                    vec![format!("python3 -m pip install {}", driver)]
                ),
                None => assert!(runner.commands().is_empty()),
            }
        }
    }

    #[test]
    fn test_label_is_case_insensitive() {
        let (_temp, layout) = scaffold();
        let mut config = config();
        config.db_type = "postgresql".to_string();
        let runner = RecordingRunner::new();
        let installer = PackageInstaller::new(&runner, &layout, &config.packages);
        let ctx = StepContext::new(&config, &layout, &installer);

        DatabaseStep.apply(&ctx).unwrap();
        assert!(read(layout.settings()).contains("django.db.backends.postgresql"));
    }

    #[test]
    fn test_unknown_database() {
        let (_temp, layout) = scaffold();
        let mut config = config();
        config.db_type = "MongoDB".to_string();
        let runner = RecordingRunner::new();
        let installer = PackageInstaller::new(&runner, &layout, &config.packages);
        let ctx = StepContext::new(&config, &layout, &installer);

        let result = DatabaseStep.apply(&ctx);
        assert!(matches!(result, Err(Error::UnknownDatabase { .. })));
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn test_empty_database_is_not_selected() {
        assert!(!DatabaseStep.enabled(&config()));
    }

    #[test]
    fn test_missing_databases_block() {
        let (_temp, layout) = scaffold();
        fs::write(layout.settings(), "DEBUG = True\n").unwrap();
        let mut config = config();
        config.db_type = "SQLite".to_string();
        let runner = RecordingRunner::new();
        let installer = PackageInstaller::new(&runner, &layout, &config.packages);
        let ctx = StepContext::new(&config, &layout, &installer);

        let result = DatabaseStep.apply(&ctx);
        assert!(matches!(result, Err(Error::MissingMarker { .. })));
        assert_eq!(read(layout.settings()), "DEBUG = True\n");
    }
}
