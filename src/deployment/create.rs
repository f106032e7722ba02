use std::time::Duration;
use tracing::info;

use super::error::DeployError;
use super::poll::{poll_deployment, PollBudget, SINGLE_POLL_INTERVAL};
use super::query::DEPLOYMENTS_PATH;
use super::request::{build_request, CreateDeploymentOptions};
use crate::api::models::Deployment;
use crate::api::{post_json, RestClient};

/// Create one deployment and optionally wait for its outcome.
///
/// Exactly one creation request is sent; a failed request is returned
/// immediately. With `wait` and a budget above the poll interval the
/// deployment is followed by tracking id and the polled state returned.
pub async fn create_deployment(
    client: &dyn RestClient,
    options: &CreateDeploymentOptions,
) -> Result<Deployment, DeployError> {
    options.validate()?;

    let request = build_request(client, options).await?;

    info!(
        "Creating deployment of {} on environment {}",
        request.app_server_name, request.environment_name
    );
    let created: Deployment = post_json(client, DEPLOYMENTS_PATH, &request).await?;
    info!(
        "Deployment of {} created with tracking id {}",
        created.app_server_name, created.tracking_id
    );

    if should_wait(options.wait, options.max_wait, SINGLE_POLL_INTERVAL) {
        return poll_deployment(client, created.tracking_id, PollBudget::single(options.max_wait))
            .await;
    }

    Ok(created)
}

pub(crate) fn should_wait(wait: bool, max_wait: Duration, interval: Duration) -> bool {
    wait && max_wait > interval
}
