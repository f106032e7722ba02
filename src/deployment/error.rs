use std::path::PathBuf;

use crate::api::models::Deployment;
use crate::api::ApiError;

/// Errors surfaced by the deployment workflows
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// All violations found in the command options, reported before any request
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid deployment filter: {0}")]
    InvalidFilter(#[source] serde_json::Error),

    #[error("There was an error on creating the deployment, no deployment found from environment: {environment}")]
    NoSourceDeployment { environment: String },

    #[error("{0}")]
    UnexpectedResult(String),

    /// The wait budget ran out; `last` is the most recent snapshot
    #[error("Timeout on waiting for deployments after {attempts} attempts")]
    Timeout {
        attempts: u64,
        last: Vec<Deployment>,
    },

    /// A creation failed after `created` were already submitted
    #[error("Error creating deployment for app server {app_server} ({} already created): {source}", .created.len())]
    PartialFailure {
        app_server: String,
        created: Vec<Deployment>,
        #[source]
        source: Box<DeployError>,
    },

    #[error("Error reading blacklist {}: {source}", .path.display())]
    Blacklist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DeployError {
    /// Deployments carried by the error that the user should still see
    pub fn deployments(&self) -> &[Deployment] {
        match self {
            DeployError::Timeout { last, .. } => last,
            DeployError::PartialFailure { created, .. } => created,
            _ => &[],
        }
    }
}

/// Collects validation violations so all of them are reported at once
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<String>);

impl Violations {
    pub fn check(&mut self, is_valid: bool, message: impl FnOnce() -> String) {
        if !is_valid {
            self.0.push(message());
        }
    }

    pub fn push(&mut self, message: String) {
        self.0.push(message);
    }

    pub fn into_result(self) -> Result<(), DeployError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DeployError::Validation(self.0))
        }
    }
}

/// Environments are identified by a single letter
pub(crate) fn is_single_char_environment(name: &str) -> bool {
    let mut chars = name.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic())
}
