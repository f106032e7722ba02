use anyhow::{bail, Context, Result};
use chrono::{Local, TimeZone};
use clap::Args;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Color, Table,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::api::models::{Deployment, DeploymentState};
use crate::api::RestClient;
use crate::deployment::{
    create_deployment, get_deployments, install_deployments, parse_filter_expression,
    promote_deployments, sort_by_app_server, sort_by_state_then_app_server, Confirm,
    CreateDeploymentOptions, DeployError, DeploymentFilter, DeploymentQuery, InstallOptions,
    PromoteOptions, PromotionOutcome, SuccessPolicy,
};

#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    /// Application names
    #[arg(long = "app-name", short = 'n', alias = "appName", value_delimiter = ',')]
    pub app_names: Vec<String>,
    /// Application server names
    #[arg(long = "app-server", short = 'a', alias = "appServer", value_delimiter = ',')]
    pub app_servers: Vec<String>,
    /// Deployment states (e.g. success, failed, progress)
    #[arg(
        long = "deployment-state",
        short = 'd',
        alias = "deploymentState",
        value_delimiter = ','
    )]
    pub states: Vec<DeploymentState>,
    /// Environment names
    #[arg(long = "environment", short = 'e', value_delimiter = ',')]
    pub environments: Vec<String>,
    /// Only the latest deployment per app server and environment
    #[arg(long, short = 'l', alias = "onlyLatest")]
    pub only_latest: bool,
    #[arg(long, short = 't', alias = "trackingId")]
    pub tracking_id: Option<i64>,
    /// Deployment ids
    #[arg(long = "id", short = 'i', value_delimiter = ',')]
    pub ids: Vec<i64>,
    /// Raw filter in JSON, e.g. '[{"name":"Environment","comp":"eq","val":"Y"}]'
    #[arg(
        long,
        short = 'f',
        conflicts_with_all = ["app_names", "app_servers", "states", "environments", "only_latest", "tracking_id", "ids"]
    )]
    pub filter: Option<String>,
}

impl GetArgs {
    fn query(&self) -> Result<DeploymentQuery> {
        if let Some(raw) = &self.filter {
            return Ok(DeploymentQuery::Expression(parse_filter_expression(raw)?));
        }

        Ok(DeploymentQuery::Filter(DeploymentFilter {
            ids: self.ids.clone(),
            app_names: self.app_names.clone(),
            app_servers: self.app_servers.clone(),
            states: self.states.clone(),
            environments: self.environments.clone(),
            tracking_id: self.tracking_id,
            only_latest: self.only_latest,
        }))
    }
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Application server name
    #[arg(long, short = 'a', alias = "appServer", default_value = "")]
    pub app_server: String,
    /// Application names, paired by position with --version
    #[arg(long = "app-name", short = 'n', alias = "appName", value_delimiter = ',')]
    pub app_names: Vec<String>,
    /// Application versions
    #[arg(long = "version", short = 'v', value_delimiter = ',')]
    pub app_versions: Vec<String>,
    /// Target environment
    #[arg(long, short = 'e')]
    pub environment: String,
    #[arg(long, short = 'r')]
    pub release: Option<String>,
    /// Deployment date 'YYYY-MM-DD hh:mm' or 'DD.MM.YYYY hh:mm' (default: now)
    #[arg(long = "date", short = 'd')]
    pub deployment_date: Option<String>,
    /// Run the shakedown test after the deployment
    #[arg(long, short = 's', alias = "executeShakeDownTest")]
    pub execute_shakedown_test: bool,
    /// Deployment parameter keys, paired by position with --value
    #[arg(long = "key", short = 'k', value_delimiter = ',')]
    pub keys: Vec<String>,
    /// Deployment parameter values
    #[arg(long = "value", short = 'x', value_delimiter = ',')]
    pub values: Vec<String>,
    /// Wait until the deployment succeeded or failed
    #[arg(long, short = 'w')]
    pub wait: bool,
    /// Max wait time in seconds
    #[arg(long = "max-wait-time", short = 't', alias = "maxWaitTime", default_value_t = 600)]
    pub max_wait_secs: u64,
    /// Copy the applications of the latest deployment in this environment
    #[arg(long, short = 'f', alias = "fromEnvironment")]
    pub from_environment: Option<String>,
    #[arg(long)]
    pub simulate: bool,
    #[arg(long)]
    pub request_only: bool,
    #[arg(long)]
    pub send_email: bool,
    #[arg(long)]
    pub neighbourhood_test: bool,
}

impl From<&CreateArgs> for CreateDeploymentOptions {
    fn from(args: &CreateArgs) -> Self {
        CreateDeploymentOptions {
            app_server: args.app_server.clone(),
            app_names: args.app_names.clone(),
            app_versions: args.app_versions.clone(),
            environment: args.environment.clone(),
            release: args.release.clone(),
            deployment_date: args.deployment_date.clone(),
            execute_shakedown_test: args.execute_shakedown_test,
            keys: args.keys.clone(),
            values: args.values.clone(),
            send_email: args.send_email,
            request_only: args.request_only,
            simulate: args.simulate,
            neighbourhood_test: args.neighbourhood_test,
            wait: args.wait,
            max_wait: Duration::from_secs(args.max_wait_secs),
            from_environment: args.from_environment.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PromoteArgs {
    /// Target environment
    #[arg(long, short = 'e')]
    pub environment: String,
    /// Environment whose latest successful deployments are promoted
    #[arg(long, short = 'f', alias = "fromEnvironment")]
    pub from_environment: String,
    /// Deployment date 'YYYY-MM-DD hh:mm' or 'DD.MM.YYYY hh:mm' (default: now)
    #[arg(long = "date", short = 'd')]
    pub deployment_date: Option<String>,
    #[arg(long, short = 's', alias = "executeShakeDownTest")]
    pub execute_shakedown_test: bool,
    /// Wait until all deployments succeeded or failed
    #[arg(long, short = 'w')]
    pub wait: bool,
    /// Max wait time in seconds
    #[arg(long = "max-wait-time", short = 't', alias = "maxWaitTime", default_value_t = 600)]
    pub max_wait_secs: u64,
    /// Only promote these app servers (default: the whole environment)
    #[arg(long = "whitelist-app-server", short = 'a', alias = "whitelistAppServer", value_delimiter = ',')]
    pub whitelist_app_servers: Vec<String>,
    /// App servers to leave out
    #[arg(long = "blacklist-app-server", short = 'b', alias = "blacklistAppServer", value_delimiter = ',')]
    pub blacklist_app_servers: Vec<String>,
    /// Runtimes to leave out
    #[arg(long = "blacklist-runtime", short = 'r', alias = "blacklistRuntime", value_delimiter = ',')]
    pub blacklist_runtimes: Vec<String>,
    /// No confirmation prompt
    #[arg(long, short = 'c')]
    pub silent: bool,
    /// Treat rejected deployments as a failed promotion
    #[arg(long)]
    pub strict: bool,
}

impl From<&PromoteArgs> for PromoteOptions {
    fn from(args: &PromoteArgs) -> Self {
        PromoteOptions {
            environment: args.environment.clone(),
            from_environment: args.from_environment.clone(),
            deployment_date: args.deployment_date.clone(),
            execute_shakedown_test: args.execute_shakedown_test,
            wait: args.wait,
            max_wait: Duration::from_secs(args.max_wait_secs),
            whitelist_app_servers: args.whitelist_app_servers.clone(),
            blacklist_app_servers: args.blacklist_app_servers.clone(),
            blacklist_runtimes: args.blacklist_runtimes.clone(),
            silent: args.silent,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    /// Target environment
    #[arg(long, short = 'e')]
    pub environment: String,
    /// Environment whose latest successful deployments are installed
    #[arg(long, short = 'f', alias = "fromEnvironment")]
    pub from_environment: String,
    /// Deployment date 'YYYY-MM-DD hh:mm' or 'DD.MM.YYYY hh:mm' (default: now)
    #[arg(long = "date", short = 'd')]
    pub deployment_date: Option<String>,
    #[arg(long, short = 's', alias = "executeShakeDownTest")]
    pub execute_shakedown_test: bool,
    #[arg(long, short = 'w')]
    pub wait: bool,
    /// Max wait time in seconds
    #[arg(long = "max-wait-time", short = 't', alias = "maxWaitTime", default_value_t = 600)]
    pub max_wait_secs: u64,
    /// File with one app server per line that should not be deployed
    #[arg(long, short = 'b')]
    pub blacklist: Option<PathBuf>,
}

impl From<&InstallArgs> for InstallOptions {
    fn from(args: &InstallArgs) -> Self {
        InstallOptions {
            environment: args.environment.clone(),
            from_environment: args.from_environment.clone(),
            deployment_date: args.deployment_date.clone(),
            execute_shakedown_test: args.execute_shakedown_test,
            wait: args.wait,
            max_wait: Duration::from_secs(args.max_wait_secs),
            blacklist_file: args.blacklist.clone(),
        }
    }
}

/// List deployments matching the given filter
pub async fn get(client: &dyn RestClient, args: &GetArgs) -> Result<()> {
    let query = args.query()?;
    let mut deployments = get_deployments(client, &query)
        .await
        .context("Failed to get deployments")?;

    if deployments.is_empty() {
        println!("No deployments found");
        return Ok(());
    }

    sort_by_app_server(&mut deployments);
    print_deployments(&deployments);
    Ok(())
}

/// Create one deployment; a `failed` result is a command failure
pub async fn create(client: &dyn RestClient, args: &CreateArgs) -> Result<()> {
    let options = CreateDeploymentOptions::from(args);
    let deployment = create_deployment(client, &options)
        .await
        .map_err(show_carried_deployments)?;

    print_deployments(std::slice::from_ref(&deployment));

    if deployment.state == DeploymentState::Failed {
        bail!(
            "Deployment of {} on environment {} failed",
            deployment.app_server_name,
            deployment.environment_name
        );
    }
    Ok(())
}

pub async fn promote(
    client: &dyn RestClient,
    confirm: &dyn Confirm,
    args: &PromoteArgs,
) -> Result<()> {
    let policy = if args.strict {
        SuccessPolicy::Strict
    } else {
        SuccessPolicy::AllowRejected
    };

    let outcome = promote_deployments(client, confirm, &PromoteOptions::from(args))
        .await
        .map_err(show_carried_deployments)?;

    if !report(&outcome) {
        return Ok(());
    }

    if !outcome.succeeded(policy) {
        bail!(
            "Promotion from {} to {} did not succeed",
            args.from_environment,
            args.environment
        );
    }
    Ok(())
}

pub async fn install(
    client: &dyn RestClient,
    confirm: &dyn Confirm,
    args: &InstallArgs,
) -> Result<()> {
    let outcome = install_deployments(client, confirm, &InstallOptions::from(args))
        .await
        .map_err(show_carried_deployments)?;

    if !report(&outcome) {
        return Ok(());
    }

    if outcome.any_failed() {
        bail!(
            "Installation from {} to {} has failed deployments",
            args.from_environment,
            args.environment
        );
    }
    Ok(())
}

/// Print a batch result, returns false when nothing was deployed
fn report(outcome: &PromotionOutcome) -> bool {
    if outcome.declined {
        info!("Nothing deployed");
        return false;
    }
    if outcome.deployments.is_empty() {
        println!("No deployments created");
        return false;
    }

    let mut deployments = outcome.deployments.clone();
    sort_by_state_then_app_server(&mut deployments);
    print_deployments(&deployments);
    true
}

/// Deployments carried by an error are printed before the error is reported
fn show_carried_deployments(err: DeployError) -> anyhow::Error {
    let deployments = err.deployments();
    if !deployments.is_empty() {
        let mut deployments = deployments.to_vec();
        sort_by_state_then_app_server(&mut deployments);
        print_deployments(&deployments);
    }
    anyhow::Error::new(err)
}

fn print_deployments(deployments: &[Deployment]) {
    println!("{}", deployment_table(deployments));
}

fn deployment_table(deployments: &[Deployment]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("APP SERVER").add_attribute(Attribute::Bold),
            Cell::new("ENV").add_attribute(Attribute::Bold),
            Cell::new("RELEASE").add_attribute(Attribute::Bold),
            Cell::new("DATE").add_attribute(Attribute::Bold),
            Cell::new("STATE").add_attribute(Attribute::Bold),
            Cell::new("TRACKING ID").add_attribute(Attribute::Bold),
            Cell::new("APPLICATIONS").add_attribute(Attribute::Bold),
        ]);

    for deployment in deployments {
        let state_cell = match deployment.state {
            DeploymentState::Success => Cell::new(deployment.state).fg(Color::Green),
            DeploymentState::Failed => Cell::new(deployment.state).fg(Color::Red),
            state if state.is_terminal() => Cell::new(state).fg(Color::Yellow),
            _ => Cell::new(deployment.state),
        };

        let apps = deployment
            .apps_with_version
            .iter()
            .map(|app| app.to_string())
            .collect::<Vec<_>>()
            .join("\n");

        table.add_row(vec![
            Cell::new(&deployment.app_server_name),
            Cell::new(&deployment.environment_name),
            Cell::new(deployment.release_name.as_deref().unwrap_or("-")),
            Cell::new(format_date(deployment.deployment_date)),
            state_cell,
            Cell::new(deployment.tracking_id),
            Cell::new(apps),
        ]);
    }

    table
}

/// Epoch milliseconds as local `YYYY-MM-DDThh:mm`
fn format_date(millis: Option<i64>) -> String {
    millis
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .map(|date| date.format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
