//! CI variables command

use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use kiln_core::CiConfig;
use kiln_projects::ci::{deployment_variables, CiCredentials, GitLabClient, VariableStatus};

use crate::cli::{CiVarsArgs, GlobalOptions};
use crate::commands::{interactive, load_project};
use crate::output;

pub fn run(args: CiVarsArgs, globals: &GlobalOptions) -> Result<()> {
    let project = load_project(globals)?;
    let config = &project.config;

    if globals.dry_run {
        output::header("Variables that would be set");
        for (key, value) in deployment_variables(&config.deployment) {
            output::kv(key, &value);
        }
        return Ok(());
    }

    let credentials = resolve_credentials(
        &config.ci,
        args.project_id,
        args.token,
        interactive(globals),
    )?;
    if let Some(reason) = credentials.skip_reason() {
        output::info(reason);
        return Ok(());
    }

    output::header("Setting GitLab CI/CD variables");
    let client = GitLabClient::new(&config.ci.api_url)?;
    let report = client
        .push_variables(&credentials, &config.deployment)
        .context("Failed to reach the GitLab API")?;

    for result in &report.results {
        match &result.status {
            VariableStatus::Created => {
                output::success(&format!("Set variable: {}", result.key))
            }
            VariableStatus::Rejected { status, .. } => output::error(&format!(
                "Failed to set variable: {}. Status code: {}",
                result.key, status
            )),
        }
    }

    if report.all_created() {
        output::success("GitLab CI/CD variables set successfully!");
        Ok(())
    } else {
        anyhow::bail!("Some CI variables could not be set")
    }
}

/// Credentials from flags, then answers/environment, then prompts.
///
/// Prompts are only shown when `interactive`; an opt-out answer for the
/// project id skips the token prompt.
pub fn resolve_credentials(
    config: &CiConfig,
    project_id: Option<String>,
    token: Option<String>,
    interactive: bool,
) -> Result<CiCredentials> {
    let mut credentials = CiCredentials::from_config(config);
    if let Some(project_id) = project_id {
        credentials.project_id = project_id;
    }
    if let Some(token) = token {
        credentials.token = token;
    }

    if !interactive {
        return Ok(credentials);
    }

    if credentials.project_id.trim().is_empty() {
        credentials.project_id = Input::<String>::new()
            .with_prompt("GitLab project ID (MANUAL to set up manually)")
            .allow_empty(true)
            .interact_text()?;
    }

    let opted_out = credentials.project_id.trim().is_empty()
        || credentials.project_id.trim().eq_ignore_ascii_case("manual");
    if !opted_out && credentials.token.trim().is_empty() {
        credentials.token = Password::new()
            .with_prompt("GitLab personal access token (CANCEL to skip)")
            .allow_empty_password(true)
            .interact()?;
    }

    Ok(credentials)
}
