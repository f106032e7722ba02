use tracing::debug;

use crate::api::models::Hostname;
use crate::api::{get_json, ApiError, RestClient};
use crate::deployment::join_values;

const HOSTNAMES_PATH: &str = "resources/hostNames";

/// Hostname lookup criteria; empty fields impose no constraint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostnameFilter {
    pub app_servers: Vec<String>,
    pub runtimes: Vec<String>,
    pub environments: Vec<String>,
    pub hosts: Vec<String>,
    pub nodes: Vec<String>,
    /// Report each release separately instead of merging them
    pub disable_merge: bool,
}

impl HostnameFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("appServer", join_values(&self.app_servers)),
            ("runtime", join_values(&self.runtimes)),
            ("environment", join_values(&self.environments)),
            ("host", join_values(&self.hosts)),
            ("node", join_values(&self.nodes)),
            ("disableMerge", self.disable_merge.then(|| "true".to_string())),
        ]
    }

    fn path(&self) -> String {
        let query: Vec<String> = self
            .query_pairs()
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, v)))
            .collect();
        if query.is_empty() {
            HOSTNAMES_PATH.to_string()
        } else {
            format!("{}?{}", HOSTNAMES_PATH, query.join("&"))
        }
    }
}

/// Fetch hostnames matching `filter`, sorted by domain
pub async fn get_hostnames(
    client: &dyn RestClient,
    filter: &HostnameFilter,
) -> Result<Vec<Hostname>, ApiError> {
    let path = filter.path();
    debug!("Querying hostnames: {}", path);

    let mut hostnames: Vec<Hostname> = get_json(client, &path).await?;
    hostnames.sort_by(|a, b| a.domain.cmp(&b.domain));
    Ok(hostnames)
}
