//! Embedded file templates and snippets
//!
//! Files written into the project and blocks appended to the settings module
//! live under `templates/` and are compiled into the binary. Names ending in
//! `.tera` are rendered with the project context, everything else is
//! returned verbatim.

use crate::error::{Error, Result};
use rust_embed::RustEmbed;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/templates/"]
struct Assets;

/// Values available to `.tera` templates
#[derive(Debug, Clone, Serialize)]
pub struct AssetContext {
    pub project_slug: String,
}

impl AssetContext {
    pub fn new(project_slug: impl Into<String>) -> Self {
        Self {
            project_slug: project_slug.into(),
        }
    }
}

/// Raw content of an embedded asset
pub fn raw(name: &str) -> Result<String> {
    let file = Assets::get(name).ok_or_else(|| Error::asset_not_found(name))?;
    String::from_utf8(file.data.into_owned())
        .map_err(|_| Error::asset_not_found(format!("{} (invalid UTF-8)", name)))
}

/// Render an embedded asset, `.tera` assets get the project context applied
pub fn render(name: &str, ctx: &AssetContext) -> Result<String> {
    let source = raw(name)?;
    if !name.ends_with(".tera") {
        return Ok(source);
    }

    debug!("Rendering template {} for {}", name, ctx.project_slug);
    let mut tera = Tera::default();
    tera.add_raw_template(name, &source)?;
    Ok(tera.render(name, &Context::from_serialize(ctx)?)?)
}
