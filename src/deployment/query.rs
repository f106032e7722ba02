use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::DeployError;
use crate::api::models::{Deployment, DeploymentState};
use crate::api::{get_json, RestClient};

pub const DEPLOYMENTS_PATH: &str = "resources/deployments";
const DEPLOYMENT_FILTER_PATH: &str = "resources/deployments/filter";

/// Structured match criteria; empty fields impose no constraint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentFilter {
    pub ids: Vec<i64>,
    pub app_names: Vec<String>,
    pub app_servers: Vec<String>,
    pub states: Vec<DeploymentState>,
    pub environments: Vec<String>,
    pub tracking_id: Option<i64>,
    pub only_latest: bool,
}

impl DeploymentFilter {
    pub fn by_tracking_id(tracking_id: i64) -> Self {
        Self {
            tracking_id: Some(tracking_id),
            ..Default::default()
        }
    }

    /// Latest deployment of every app server in `environment`
    pub fn latest_in_environment(environment: &str) -> Self {
        Self {
            environments: vec![environment.to_string()],
            only_latest: true,
            ..Default::default()
        }
    }

    pub fn with_app_servers(mut self, app_servers: Vec<String>) -> Self {
        self.app_servers = app_servers;
        self
    }

    /// Query parameters in wire order; `None` values are left out of the URL
    pub fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("id", join_values(&self.ids)),
            ("appName", join_values(&self.app_names)),
            ("appServerName", join_values(&self.app_servers)),
            ("deploymentState", join_values(&self.states)),
            ("environmentName", join_values(&self.environments)),
            ("trackingId", self.tracking_id.map(|id| id.to_string())),
            ("onlyLatest", self.only_latest.then(|| "true".to_string())),
        ]
    }

    pub fn to_query_string(&self) -> String {
        self.query_pairs()
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Percent-encode each element and join with commas
pub(crate) fn join_values<T: ToString>(values: &[T]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let encoded: Vec<String> = values
        .iter()
        .map(|v| urlencoding::encode(&v.to_string()).into_owned())
        .collect();
    Some(encoded.join(","))
}

/// One predicate of a raw filter expression, passed through to the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterPredicate {
    pub name: String,
    pub comp: String,
    pub val: String,
}

impl FilterPredicate {
    pub fn eq(name: &str, val: &str) -> Self {
        Self {
            name: name.to_string(),
            comp: "eq".to_string(),
            val: val.to_string(),
        }
    }
}

/// Parse a JSON filter expression such as
/// `[{"name":"Environment","comp":"eq","val":"Y"}]`
pub fn parse_filter_expression(raw: &str) -> Result<Vec<FilterPredicate>, DeployError> {
    serde_json::from_str(raw).map_err(DeployError::InvalidFilter)
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeploymentQuery {
    Filter(DeploymentFilter),
    Expression(Vec<FilterPredicate>),
}

impl From<DeploymentFilter> for DeploymentQuery {
    fn from(filter: DeploymentFilter) -> Self {
        DeploymentQuery::Filter(filter)
    }
}

impl DeploymentQuery {
    /// Request path including the query string
    pub fn path(&self) -> Result<String, DeployError> {
        match self {
            DeploymentQuery::Filter(filter) => {
                let query = filter.to_query_string();
                if query.is_empty() {
                    Ok(DEPLOYMENTS_PATH.to_string())
                } else {
                    Ok(format!("{}?{}", DEPLOYMENTS_PATH, query))
                }
            }
            DeploymentQuery::Expression(predicates) => {
                let json = serde_json::to_string(predicates).map_err(DeployError::InvalidFilter)?;
                Ok(format!(
                    "{}?filters={}",
                    DEPLOYMENT_FILTER_PATH,
                    urlencoding::encode(&json)
                ))
            }
        }
    }
}

/// Fetch all deployments matching `query`.
///
/// An empty result is returned as such; callers decide if that is an error.
pub async fn get_deployments(
    client: &dyn RestClient,
    query: &DeploymentQuery,
) -> Result<Vec<Deployment>, DeployError> {
    let path = query.path()?;
    debug!("Querying deployments: {}", path);
    let deployments: Vec<Deployment> = get_json(client, &path).await?;
    debug!("Query returned {} deployment(s)", deployments.len());
    Ok(deployments)
}

/// Default listing order
pub fn sort_by_app_server(deployments: &mut [Deployment]) {
    deployments.sort_by(|a, b| a.app_server_name.cmp(&b.app_server_name));
}

/// Report order, groups deployments by outcome
pub fn sort_by_state_then_app_server(deployments: &mut [Deployment]) {
    deployments.sort_by(|a, b| {
        a.state
            .as_str()
            .cmp(b.state.as_str())
            .then_with(|| a.app_server_name.cmp(&b.app_server_name))
    });
}
