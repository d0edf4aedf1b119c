use crate::assets;
use crate::error::Result;
use crate::features::write_if_absent;
use crate::layout::ProjectLayout;
use crate::pipeline::{Step, StepContext, StepStatus};
use camino::Utf8PathBuf;
use std::fs;
use tracing::info;

/// Writes the container files, or removes them when containers were declined
pub struct DockerStep;

impl Step for DockerStep {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepStatus> {
        if !ctx.config.use_docker {
            info!("Docker not selected, removing Docker-related files.");
            let removed = remove_docker_files(ctx.layout)?;
            if removed.is_empty() {
                return Ok(StepStatus::skipped("no Docker files present"));
            }
            return Ok(StepStatus::Applied);
        }

        info!("Setting up docker...");
        ctx.installer.install(&["gunicorn"])?;

        let assets = ctx.assets();
        write_if_absent(
            &ctx.layout.dockerfile(),
            &assets::render("docker/Dockerfile.tera", &assets)?,
        )?;
        write_if_absent(
            &ctx.layout.compose_file(),
            &assets::render("docker/docker-compose.yml.tera", &assets)?,
        )?;
        write_if_absent(&ctx.layout.dockerignore(), &assets::raw("docker/dockerignore")?)?;

        Ok(StepStatus::Applied)
    }
}

/// Remove `.dockerignore`, `Dockerfile`, `docker-compose.yml` and `docker/`,
/// returning the paths that existed.
pub fn remove_docker_files(layout: &ProjectLayout) -> Result<Vec<Utf8PathBuf>> {
    let mut removed = Vec::new();

    for file in [layout.dockerignore(), layout.dockerfile(), layout.compose_file()] {
        if file.is_file() {
            fs::remove_file(&file)?;
            info!("Removed {}", file);
            removed.push(file);
        }
    }

    let dir = layout.docker_dir();
    if dir.is_dir() {
        fs::remove_dir_all(&dir)?;
        info!("Removed {}", dir);
        removed.push(dir);
    }

    Ok(removed)
}
