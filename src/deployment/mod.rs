//! Deployment orchestration: query, create, wait and promote.
//!
//! Every workflow takes the transport as `&dyn RestClient` and runs its
//! requests strictly one after another.

mod create;
mod error;
mod poll;
mod promote;
mod query;
mod request;

pub use create::create_deployment;
pub use error::DeployError;
pub use promote::{
    install_deployments, promote_deployments, Confirm, InstallOptions, PromoteOptions,
    PromotionOutcome, SuccessPolicy,
};
pub use query::{
    get_deployments, parse_filter_expression, sort_by_app_server, sort_by_state_then_app_server,
    DeploymentFilter, DeploymentQuery,
};
pub use request::CreateDeploymentOptions;

pub(crate) use query::join_values;
