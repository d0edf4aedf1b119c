//! Deployment variables pushed to the GitLab CI settings API
//!
//! One `POST {api}/projects/{id}/variables` per variable. A non-201 answer is
//! recorded as a failure for that variable and the remaining variables are
//! still sent; transport errors abort the run.

use crate::error::{Error, Result};
use crate::pipeline::{Step, StepContext, StepStatus};
use kiln_core::{CiConfig, DeploymentConfig};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Variables created for every project
pub const VARIABLE_KEYS: [&str; 3] = ["DEPLOYMENT_USER", "DEPLOYMENT_SERVER", "DEPLOYMENT_PORT"];

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Project id and access token for the settings API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiCredentials {
    pub project_id: String,
    pub token: String,
}

impl CiCredentials {
    pub fn new(project_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            token: token.into(),
        }
    }

    /// Credentials from the answers file and environment, empty when unset
    pub fn from_config(config: &CiConfig) -> Self {
        Self::new(
            config.project_id.clone().unwrap_or_default(),
            config.token.clone().unwrap_or_default(),
        )
    }

    /// Why variables must not be sent with these credentials, if at all.
    ///
    /// A project id of `manual` and a token of `cancel` (any case) are the
    /// answers users give to opt out at the prompt.
    pub fn skip_reason(&self) -> Option<&'static str> {
        let project_id = self.project_id.trim();
        let token = self.token.trim();

        if project_id.is_empty() || project_id.eq_ignore_ascii_case("manual") {
            Some("GitLab project id not provided, set variables manually")
        } else if token.is_empty() || token.eq_ignore_ascii_case("cancel") {
            Some("GitLab access token not provided, set variables manually")
        } else {
            None
        }
    }
}

#[derive(Debug, Serialize)]
struct VariablePayload<'a> {
    key: &'a str,
    value: &'a str,
    protected: bool,
    masked: bool,
}

/// Outcome for one variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableStatus {
    Created,
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableResult {
    pub key: String,
    pub status: VariableStatus,
}

#[derive(Debug, Clone, Default)]
pub struct CiReport {
    pub results: Vec<VariableResult>,
}

impl CiReport {
    pub fn failures(&self) -> impl Iterator<Item = &VariableResult> {
        self.results
            .iter()
            .filter(|r| r.status != VariableStatus::Created)
    }

    pub fn all_created(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// `(key, value)` pairs sent for a deployment target
pub fn deployment_variables(deployment: &DeploymentConfig) -> Vec<(&'static str, String)> {
    let values = [
        deployment.user.clone(),
        deployment.server.clone(),
        deployment.port.clone(),
    ];
    VARIABLE_KEYS.into_iter().zip(values).collect()
}

/// Blocking client for the project variables endpoint
pub struct GitLabClient {
    http: Client,
    api_url: String,
}

impl GitLabClient {
    pub fn new(api_url: &str) -> Result<Self> {
        let api_url = api_url.trim().trim_end_matches('/');
        if api_url.is_empty() {
            return Err(Error::ci_variable("GitLab API URL is empty"));
        }

        let http = Client::builder()
            .user_agent(concat!("kiln/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.to_string(),
        })
    }

    fn variables_url(&self, project_id: &str) -> String {
        // path-style ids (`group/project`) must be URL-encoded
        format!(
            "{}/projects/{}/variables",
            self.api_url,
            project_id.trim().replace('/', "%2F")
        )
    }

    /// Create one masked, unprotected variable
    pub fn create_variable(
        &self,
        credentials: &CiCredentials,
        key: &str,
        value: &str,
    ) -> Result<VariableResult> {
        let url = self.variables_url(&credentials.project_id);
        debug!("POST {} ({})", url, key);

        let response = self
            .http
            .post(&url)
            .header(TOKEN_HEADER, credentials.token.trim())
            .json(&VariablePayload {
                key,
                value,
                protected: false,
                masked: true,
            })
            .send()?;

        let status = response.status();
        let result = if status == StatusCode::CREATED {
            info!("Variable {} created successfully.", key);
            VariableStatus::Created
        } else {
            let body = response.text().unwrap_or_default();
            warn!("Failed to create variable {}: {}", key, body);
            VariableStatus::Rejected {
                status: status.as_u16(),
                body,
            }
        };

        Ok(VariableResult {
            key: key.to_string(),
            status: result,
        })
    }

    /// Send every deployment variable, collecting per-variable outcomes
    pub fn push_variables(
        &self,
        credentials: &CiCredentials,
        deployment: &DeploymentConfig,
    ) -> Result<CiReport> {
        let mut report = CiReport::default();
        for (key, value) in deployment_variables(deployment) {
            report
                .results
                .push(self.create_variable(credentials, key, &value)?);
        }
        Ok(report)
    }
}

/// Pipeline step sending the deployment variables
pub struct CiVariablesStep {
    credentials: CiCredentials,
}

impl CiVariablesStep {
    pub fn new(credentials: CiCredentials) -> Self {
        Self { credentials }
    }
}

impl Step for CiVariablesStep {
    fn name(&self) -> &'static str {
        "ci-variables"
    }

    fn apply(&self, ctx: &StepContext<'_>) -> Result<StepStatus> {
        if let Some(reason) = self.credentials.skip_reason() {
            info!("{}", reason);
            return Ok(StepStatus::skipped(reason));
        }

        let client = GitLabClient::new(&ctx.config.ci.api_url)?;
        let report = client.push_variables(&self.credentials, &ctx.config.deployment)?;

        if report.all_created() {
            return Ok(StepStatus::Applied);
        }
        Ok(StepStatus::Warned(
            report
                .failures()
                .map(|r| match &r.status {
                    VariableStatus::Rejected { status, .. } => {
                        format!("{} rejected with HTTP {}", r.key, status)
                    }
                    VariableStatus::Created => r.key.clone(),
                })
                .collect(),
        ))
    }
}
