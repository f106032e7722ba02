//! Wire types exchanged with the Liima REST API
//!
//! Field names follow the server's camelCase JSON. Responses are decoded
//! leniently (missing fields default) because the server omits empty values.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    #[default]
    Requested,
    Scheduled,
    Delayed,
    Simulating,
    Progress,
    PreDeploy,
    ReadyForDeploy,
    Success,
    Failed,
    Rejected,
    Canceled,
    /// Any state string this client does not know about
    #[serde(other)]
    Unknown,
}

impl DeploymentState {
    pub const ALL: [DeploymentState; 11] = [
        DeploymentState::Requested,
        DeploymentState::Scheduled,
        DeploymentState::Delayed,
        DeploymentState::Simulating,
        DeploymentState::Progress,
        DeploymentState::PreDeploy,
        DeploymentState::ReadyForDeploy,
        DeploymentState::Success,
        DeploymentState::Failed,
        DeploymentState::Rejected,
        DeploymentState::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentState::Requested => "requested",
            DeploymentState::Scheduled => "scheduled",
            DeploymentState::Delayed => "delayed",
            DeploymentState::Simulating => "simulating",
            DeploymentState::Progress => "progress",
            DeploymentState::PreDeploy => "pre_deploy",
            DeploymentState::ReadyForDeploy => "ready_for_deploy",
            DeploymentState::Success => "success",
            DeploymentState::Failed => "failed",
            DeploymentState::Rejected => "rejected",
            DeploymentState::Canceled => "canceled",
            DeploymentState::Unknown => "unknown",
        }
    }

    /// The server will not move the deployment out of this state anymore
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentState::Success
                | DeploymentState::Failed
                | DeploymentState::Rejected
                | DeploymentState::Canceled
        )
    }

    /// The two outcomes a wait loop stops on
    pub fn is_settled(&self) -> bool {
        matches!(self, DeploymentState::Success | DeploymentState::Failed)
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeploymentState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        DeploymentState::ALL
            .into_iter()
            .find(|state| state.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = DeploymentState::ALL.iter().map(|s| s.as_str()).collect();
                format!(
                    "Invalid deployment state '{}'. Expected one of: {}",
                    s,
                    known.join(", ")
                )
            })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppWithVersion {
    pub application_name: String,
    pub version: String,
}

impl AppWithVersion {
    pub fn new(application_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for AppWithVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.application_name, self.version)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct DeploymentParameter {
    pub key: String,
    pub value: String,
}

/// A deployment as reported by the server
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Deployment {
    pub id: i64,
    pub tracking_id: i64,
    pub state: DeploymentState,
    /// Scheduled deployment instant in epoch milliseconds
    pub deployment_date: Option<i64>,
    pub app_server_name: String,
    pub app_server_id: Option<i64>,
    pub apps_with_version: Vec<AppWithVersion>,
    pub deployment_parameters: Vec<DeploymentParameter>,
    pub environment_name: String,
    pub release_name: Option<String>,
    pub runtime_name: Option<String>,
    pub request_user: Option<String>,
    pub confirm_user: Option<String>,
    pub cancel_user: Option<String>,
}

/// Payload of `POST resources/deployments`
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    pub release_name: Option<String>,
    pub app_server_name: String,
    pub environment_name: String,
    pub apps_with_version: Vec<AppWithVersion>,
    pub deployment_parameters: Vec<DeploymentParameter>,
    pub context_ids: Option<Vec<String>>,
    pub deployment_date: String,
    pub send_email: bool,
    pub request_only: bool,
    pub simulate: bool,
    pub execute_shakedown_test: bool,
    pub neighbourhood_test: bool,
}

/// One row of `GET resources/hostNames`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Hostname {
    pub host: String,
    pub app_server: String,
    pub app_server_release: String,
    pub runtime: String,
    pub node: String,
    pub node_release: String,
    pub environment: String,
    pub domain: String,
    pub defined_on_node: bool,
}
