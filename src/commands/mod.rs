//! CLI commands
//!
//! One entry point per command: parsed arguments plus an authenticated
//! client in, a [`CommandOutput`] or an error out.

use crate::api::client::ShareClient;
use crate::error::Result;
use crate::output::{CommandOutput, Detail, Table};
use crate::resource::Resource;
use clap::Subcommand;
use std::collections::BTreeMap;

pub mod pools;
pub mod quotas;
pub mod services;
pub mod share_servers;
pub mod share_types;
pub mod shares;
pub mod snapshots;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Shares
    #[command(subcommand)]
    Share(shares::ShareCommand),
    /// Share snapshots
    #[command(subcommand)]
    Snapshot(snapshots::SnapshotCommand),
    /// Share servers
    #[command(subcommand)]
    Server(share_servers::ServerCommand),
    /// Share types and extra specs
    #[command(subcommand, name = "type")]
    ShareType(share_types::TypeCommand),
    /// Project quotas
    #[command(subcommand)]
    Quota(quotas::QuotaCommand),
    /// Scheduler storage pools
    #[command(subcommand)]
    Pool(pools::PoolCommand),
    /// Share services
    #[command(subcommand)]
    Service(services::ServiceCommand),
}

/// Dispatch a parsed command
pub async fn run(command: Commands, client: &ShareClient) -> Result<CommandOutput> {
    tracing::info!("Running {:?}", command);
    match command {
        Commands::Share(cmd) => shares::run(cmd, client).await,
        Commands::Snapshot(cmd) => snapshots::run(cmd, client).await,
        Commands::Server(cmd) => share_servers::run(cmd, client).await,
        Commands::ShareType(cmd) => share_types::run(cmd, client).await,
        Commands::Quota(cmd) => quotas::run(cmd, client).await,
        Commands::Pool(cmd) => pools::run(cmd, client).await,
        Commands::Service(cmd) => services::run(cmd, client).await,
    }
}

/// List output using the registry columns of the resource type
pub(crate) fn list_output(columns: &[String], resources: &[Resource]) -> CommandOutput {
    CommandOutput::Table(Table::from_resources(columns, resources))
}

/// Show output of a single resource, without its `links`
pub(crate) fn show_output(resource: Resource) -> CommandOutput {
    let mut info = resource.into_info();
    info.remove("links");
    CommandOutput::Detail(Detail::from_map(&info))
}

/// Parse `key=value` arguments
pub(crate) fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected <key>=<value>, got '{}'", s)),
    }
}

pub(crate) fn to_spec_map(pairs: &[(String, String)]) -> BTreeMap<String, String> {
    pairs.iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("driver_handles_share_servers=False").unwrap(),
            (
                "driver_handles_share_servers".to_string(),
                "False".to_string()
            )
        );
        assert_eq!(
            parse_key_value("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_to_spec_map_last_wins() {
        let pairs = vec![
            ("a".to_string(), "1".to_string()),
            ("a".to_string(), "2".to_string()),
        ];
        assert_eq!(to_spec_map(&pairs).get("a").map(String::as_str), Some("2"));
    }
}
