//! Documentation landing page selection

use crate::error::Result;
use crate::layout::ProjectLayout;
use crate::pipeline::{Step, StepContext, StepStatus};
use camino::Utf8PathBuf;
use kiln_core::ProjectType;
use std::fs;
use tracing::{info, warn};

/// Copy the template matching `project_type` to `docs/index.md` and drop
/// `docs/templates/`.
///
/// Returns the written index, or `None` when the template is missing; a
/// missing template is not an error.
pub fn select_documentation(
    layout: &ProjectLayout,
    project_type: ProjectType,
) -> Result<Option<Utf8PathBuf>> {
    let source = layout.doc_templates_dir().join(project_type.doc_template());
    if !source.is_file() {
        warn!("Documentation template for {} not found.", project_type);
        return Ok(None);
    }

    let index = layout.docs_dir().join("index.md");
    fs::copy(&source, &index)?;
    info!("Documentation template for {} has been set up.", project_type);

    if let Err(e) = fs::remove_dir_all(layout.doc_templates_dir()) {
        warn!("Could not remove {}: {}", layout.doc_templates_dir(), e);
    }

    Ok(Some(index))
}

pub struct DocumentationStep;

impl Step for DocumentationStep {
    fn name(&self) -> &'static str {
        "documentation"
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepStatus> {
        let project_type = ctx.config.project_type();
        match select_documentation(ctx.layout, project_type)? {
            Some(_) => Ok(StepStatus::Applied),
            None => Ok(StepStatus::skipped(format!(
                "no documentation template for {}",
                project_type
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{read, scaffold};

    #[test]
    fn test_selects_template_by_type() {
        let (_temp, layout) = scaffold();

        let index = select_documentation(&layout, ProjectType::from_label("notification"))
            .unwrap()
            .unwrap();

        assert_eq!(read(&index), "# notification\n");
        assert!(!layout.doc_templates_dir().exists());
    }

    #[test]
    fn test_unknown_type_uses_general() {
        let (_temp, layout) = scaffold();
        let index = select_documentation(&layout, ProjectType::from_label("billing"))
            .unwrap()
            .unwrap();
        assert_eq!(read(&index), "# general\n");
    }

    #[test]
    fn test_missing_template_is_a_warning() {
        let (_temp, layout) = scaffold();
        fs::remove_file(layout.doc_templates_dir().join("vas_template.md")).unwrap();

        let result = select_documentation(&layout, ProjectType::Vas).unwrap();

        assert!(result.is_none());
        assert!(layout.doc_templates_dir().exists());
        assert!(!layout.docs_dir().join("index.md").exists());
    }
}
