use std::future::Future;
use std::time::Duration;
use tracing::info;

use super::error::DeployError;
use super::query::{get_deployments, DeploymentFilter, DeploymentQuery};
use crate::api::models::Deployment;
use crate::api::RestClient;

/// Interval when waiting for one deployment by tracking id
pub const SINGLE_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Interval when waiting for a promoted batch
pub const BATCH_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Counting wait budget: `attempts` queries spaced by `interval`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    pub interval: Duration,
    pub attempts: u64,
}

impl PollBudget {
    /// floor(max_wait / interval), at least one attempt
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        let attempts = if interval.is_zero() {
            1
        } else {
            (max_wait.as_millis() / interval.as_millis()) as u64
        };
        Self {
            interval,
            attempts: attempts.max(1),
        }
    }

    pub fn single(max_wait: Duration) -> Self {
        Self::new(SINGLE_POLL_INTERVAL, max_wait)
    }

    pub fn batch(max_wait: Duration) -> Self {
        Self::new(BATCH_POLL_INTERVAL, max_wait)
    }
}

/// Wait until the deployment with `tracking_id` succeeded or failed.
///
/// Every attempt must return exactly one deployment.
pub async fn poll_deployment(
    client: &dyn RestClient,
    tracking_id: i64,
    budget: PollBudget,
) -> Result<Deployment, DeployError> {
    let query = DeploymentQuery::from(DeploymentFilter::by_tracking_id(tracking_id));
    let query = &query;

    let mut snapshot = poll_until_settled(budget, || async move {
        let deployments = get_deployments(client, query).await?;
        if deployments.len() != 1 {
            return Err(DeployError::UnexpectedResult(format!(
                "Expected one deployment for tracking id {}, got {}",
                tracking_id,
                deployments.len()
            )));
        }
        Ok(deployments)
    })
    .await?;

    snapshot
        .pop()
        .ok_or_else(|| DeployError::UnexpectedResult("No deployment returned".to_string()))
}

/// Wait until every deployment matching `filter` succeeded or failed
pub async fn poll_deployments(
    client: &dyn RestClient,
    filter: DeploymentFilter,
    budget: PollBudget,
) -> Result<Vec<Deployment>, DeployError> {
    let query = DeploymentQuery::from(filter);
    let query = &query;

    poll_until_settled(budget, || async move {
        let deployments = get_deployments(client, query).await?;
        if deployments.is_empty() {
            return Err(DeployError::UnexpectedResult(
                "There was an error on checking the deployments, no deployment found".to_string(),
            ));
        }
        Ok(deployments)
    })
    .await
}

async fn poll_until_settled<F, Fut>(
    budget: PollBudget,
    mut fetch: F,
) -> Result<Vec<Deployment>, DeployError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<Deployment>, DeployError>>,
{
    let mut last = Vec::new();

    for attempt in 1..=budget.attempts {
        let deployments = fetch().await?;

        for deployment in &deployments {
            info!(
                "AppServer: {:<30} State: {:<20}",
                deployment.app_server_name,
                deployment.state.as_str()
            );
        }

        let settled = deployments.iter().all(|d| d.state.is_settled());
        last = deployments;
        if settled {
            return Ok(last);
        }

        if attempt < budget.attempts {
            tokio::time::sleep(budget.interval).await;
        }
    }

    Err(DeployError::Timeout {
        attempts: budget.attempts,
        last,
    })
}
