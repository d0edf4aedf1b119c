//! Optional features wired into a generated project
//!
//! Each feature is a pipeline [`Step`](crate::pipeline::Step): it installs its
//! packages, writes its files and edits the settings module. Settings edits of
//! one step are applied to a single loaded document and saved once.

mod celery;
mod database;
mod docker;
mod graphql;
mod jwt;
mod rest;
mod sentry;
mod whitenoise;

pub use celery::{CeleryStep, CELERY_PACKAGES};
pub use database::{configure_database, database_block, DatabaseStep};
pub use docker::{remove_docker_files, DockerStep};
pub use graphql::GraphqlStep;
pub use jwt::{JwtStep, JWT_AUTHENTICATION};
pub use rest::{RestFrameworkStep, REST_PACKAGES};
pub use sentry::{SentryStep, SENTRY_INTEGRATION};
pub use whitenoise::{WhitenoiseStep, WHITENOISE_MIDDLEWARE};

use crate::error::Result;
use crate::settings::ListTarget;
use camino::Utf8Path;
use std::fs;
use tracing::debug;

pub(crate) const INSTALLED_APPS: ListTarget<'static> = ListTarget::Setting("INSTALLED_APPS");
pub(crate) const MIDDLEWARE: ListTarget<'static> = ListTarget::Setting("MIDDLEWARE");
pub(crate) const SECURITY_MIDDLEWARE: &str = "django.middleware.security.SecurityMiddleware";

/// Write `content` to `path` unless the file already exists
pub(crate) fn write_if_absent(path: &Utf8Path, content: &str) -> Result<bool> {
    if path.exists() {
        debug!("{} already exists, leaving it alone", path);
        return Ok(false);
    }
    fs::write(path, content)?;
    debug!("Wrote {}", path);
    Ok(true)
}
