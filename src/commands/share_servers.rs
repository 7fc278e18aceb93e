//! `server` commands

use super::{list_output, show_output};
use crate::api::client::ShareClient;
use crate::batch::run_batch;
use crate::error::{ApiError, Result};
use crate::output::{CommandOutput, Detail};
use crate::resource::{find_resource, get_resource, SearchOpts, ShareServerManager};
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum ServerCommand {
    /// List share servers (admin only)
    List(ListArgs),
    /// Show a share server
    Show(ServerArg),
    /// Show backend details of a share server
    Details(ServerArg),
    /// Delete one or more share servers
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Filter results by host
    #[arg(long)]
    pub host: Option<String>,
    /// Filter results by status
    #[arg(long)]
    pub status: Option<String>,
    /// Filter results by share network name or ID
    #[arg(long)]
    pub share_network: Option<String>,
    /// Filter results by project ID
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Args, Debug)]
pub struct ServerArg {
    /// ID of the share server
    pub server: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// ID of the share server(s) to delete
    #[arg(required = true, num_args = 1..)]
    pub servers: Vec<String>,
}

pub async fn run(command: ServerCommand, client: &ShareClient) -> Result<CommandOutput> {
    let manager = ShareServerManager::new(client);
    match command {
        ServerCommand::List(args) => {
            let mut opts = SearchOpts::new();
            opts.insert_opt("host", args.host.as_deref());
            opts.insert_opt("status", args.status.as_deref());
            opts.insert_opt("share_network", args.share_network.as_deref());
            opts.insert_opt("project_id", args.project.as_deref());

            let def = get_resource("share_servers")
                .ok_or_else(|| ApiError::command("share server definition missing"))?;
            let servers = manager.list(&opts).await?;
            Ok(list_output(&def.columns, &servers))
        }
        ServerCommand::Show(args) => {
            let server = find_resource(&manager, &args.server).await?;
            Ok(show_output(server))
        }
        ServerCommand::Details(args) => {
            let server = find_resource(&manager, &args.server).await?;
            let details = manager.details(&server).await?;
            Ok(CommandOutput::Detail(Detail::from_map(&details)))
        }
        ServerCommand::Delete(args) => {
            let manager = &manager;
            let outcome = run_batch("delete share server", &args.servers, move |target| async move {
                let server = find_resource(manager, &target).await?;
                manager.delete(&server).await
            })
            .await;
            outcome.into_result("share servers", "delete")?;
            Ok(CommandOutput::Nothing)
        }
    }
}
