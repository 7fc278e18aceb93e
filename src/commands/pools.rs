//! `pool` commands

use super::list_output;
use crate::api::client::ShareClient;
use crate::error::{ApiError, Result};
use crate::output::CommandOutput;
use crate::resource::{get_resource, PoolManager, SearchOpts};
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum PoolCommand {
    /// List back end storage pools (admin only)
    List(ListArgs),
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Filter results by host name, regular expressions allowed
    #[arg(long)]
    pub host: Option<String>,
    /// Filter results by back end name, regular expressions allowed
    #[arg(long)]
    pub backend: Option<String>,
    /// Filter results by pool name, regular expressions allowed
    #[arg(long)]
    pub pool: Option<String>,
    /// Filter results by share type name or ID (API >= 2.23)
    #[arg(long)]
    pub share_type: Option<String>,
    /// Show pool capabilities
    #[arg(long)]
    pub detail: bool,
}

pub async fn run(command: PoolCommand, client: &ShareClient) -> Result<CommandOutput> {
    match command {
        PoolCommand::List(args) => {
            let mut opts = SearchOpts::new();
            opts.insert_opt("host", args.host.as_deref());
            opts.insert_opt("backend", args.backend.as_deref());
            opts.insert_opt("pool", args.pool.as_deref());
            opts.insert_opt("share_type", args.share_type.as_deref());

            let def =
                get_resource("pools").ok_or_else(|| ApiError::command("pool definition missing"))?;
            let mut columns = def.columns.clone();
            if args.detail {
                columns.extend(def.detail_columns.iter().cloned());
            }

            let pools = PoolManager::new(client).list(&opts, args.detail).await?;
            Ok(list_output(&columns, &pools))
        }
    }
}
