use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Table};

use crate::api::models::Hostname;
use crate::api::RestClient;
use crate::hostname::{get_hostnames, HostnameFilter};

#[derive(Args, Debug, Clone)]
pub struct HostnameArgs {
    /// Application server names
    #[arg(long = "app-server", short = 'a', alias = "appServer", value_delimiter = ',')]
    pub app_servers: Vec<String>,
    /// Runtime names
    #[arg(long = "runtime", short = 'r', value_delimiter = ',')]
    pub runtimes: Vec<String>,
    /// Environment names
    #[arg(long = "environment", short = 'e', value_delimiter = ',')]
    pub environments: Vec<String>,
    /// Host names
    #[arg(long = "hostname", short = 's', value_delimiter = ',')]
    pub hosts: Vec<String>,
    /// Node names
    #[arg(long = "node", short = 'n', value_delimiter = ',')]
    pub nodes: Vec<String>,
    /// List every release instead of merging them
    #[arg(long, short = 'd', alias = "disableMerge")]
    pub disable_merge: bool,
}

impl From<&HostnameArgs> for HostnameFilter {
    fn from(args: &HostnameArgs) -> Self {
        HostnameFilter {
            app_servers: args.app_servers.clone(),
            runtimes: args.runtimes.clone(),
            environments: args.environments.clone(),
            hosts: args.hosts.clone(),
            nodes: args.nodes.clone(),
            disable_merge: args.disable_merge,
        }
    }
}

pub async fn get(client: &dyn RestClient, args: &HostnameArgs) -> Result<()> {
    let hostnames = get_hostnames(client, &HostnameFilter::from(args))
        .await
        .context("Failed to get hostnames")?;

    if hostnames.is_empty() {
        println!("No hostnames found");
        return Ok(());
    }

    println!("{}", hostname_table(&hostnames));
    Ok(())
}

fn hostname_table(hostnames: &[Hostname]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("HOST").add_attribute(Attribute::Bold),
            Cell::new("ENV").add_attribute(Attribute::Bold),
            Cell::new("APP SERVER").add_attribute(Attribute::Bold),
            Cell::new("RELEASE").add_attribute(Attribute::Bold),
            Cell::new("RUNTIME").add_attribute(Attribute::Bold),
            Cell::new("NODE").add_attribute(Attribute::Bold),
            Cell::new("NODE RELEASE").add_attribute(Attribute::Bold),
            Cell::new("DOMAIN").add_attribute(Attribute::Bold),
        ]);

    for hostname in hostnames {
        table.add_row(vec![
            Cell::new(or_dash(&hostname.host)),
            Cell::new(or_dash(&hostname.environment)),
            Cell::new(or_dash(&hostname.app_server)),
            Cell::new(or_dash(&hostname.app_server_release)),
            Cell::new(or_dash(&hostname.runtime)),
            Cell::new(or_dash(&hostname.node)),
            Cell::new(or_dash(&hostname.node_release)),
            Cell::new(or_dash(&hostname.domain)),
        ]);
    }

    table
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
