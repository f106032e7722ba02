use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod cli;
mod config;
mod deployment;
mod hostname;

use api::LiimaClient;
use cli::StdinConfirm;

#[derive(Parser, Debug)]
#[command(author, version, about = "Command line client for Liima", long_about = None)]
pub struct Cli {
    /// Config file (default: ./liimactl.toml, then ~/.liimactl/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Liima base URL, overrides the config file and LIIMA_HOST
    #[arg(long, global = true)]
    host: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Deployment commands
    #[command(subcommand)]
    #[command(visible_alias = "d")]
    Deployment(DeploymentCommands),
    /// Hostname commands
    #[command(subcommand)]
    #[command(visible_alias = "h")]
    Hostname(HostnameCommands),
}

#[derive(Subcommand, Debug)]
enum DeploymentCommands {
    /// Get deployments matching a filter
    #[command(visible_alias = "g")]
    Get(cli::deployment::GetArgs),
    /// Create a deployment
    #[command(visible_alias = "c")]
    Create(cli::deployment::CreateArgs),
    /// Promote the latest successful deployments of one environment to another
    Promote(cli::deployment::PromoteArgs),
    /// Install an environment from another one, excluding a file based blacklist
    Install(cli::deployment::InstallArgs),
}

#[derive(Subcommand, Debug)]
enum HostnameCommands {
    /// Get hostnames matching a filter
    #[command(visible_alias = "g")]
    Get(cli::hostname::HostnameArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = config::Config::load(cli.config.as_deref(), cli.host.as_deref())?;
    let client = LiimaClient::from_config(&config)?;

    match &cli.command {
        Commands::Deployment(deployment_cmd) => match deployment_cmd {
            DeploymentCommands::Get(args) => {
                cli::deployment::get(&client, args).await?;
            }
            DeploymentCommands::Create(args) => {
                cli::deployment::create(&client, args).await?;
            }
            DeploymentCommands::Promote(args) => {
                cli::deployment::promote(&client, &StdinConfirm, args).await?;
            }
            DeploymentCommands::Install(args) => {
                cli::deployment::install(&client, &StdinConfirm, args).await?;
            }
        },
        Commands::Hostname(hostname_cmd) => match hostname_cmd {
            HostnameCommands::Get(args) => {
                cli::hostname::get(&client, args).await?;
            }
        },
    }

    Ok(())
}
