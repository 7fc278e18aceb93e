//! `share` commands

use super::{list_output, show_output};
use crate::api::client::ShareClient;
use crate::batch::run_batch;
use crate::error::{ApiError, Result};
use crate::output::{sort_items, CommandOutput};
use crate::resource::{find_resource, get_resource, SearchOpts, ShareManager};
use crate::version_gate::{VersionGate, PATTERN_FILTERS};
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum ShareCommand {
    /// List shares
    List(ListArgs),
    /// Show details about a share
    Show(ShowArgs),
    /// Delete one or more shares
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Display shares from all projects (admin only)
    #[arg(long)]
    pub all_projects: bool,
    /// Filter results by name
    #[arg(long)]
    pub name: Option<String>,
    /// Filter results by description (API >= 2.36)
    #[arg(long)]
    pub description: Option<String>,
    /// Filter results by status
    #[arg(long)]
    pub status: Option<String>,
    /// Filter results by host
    #[arg(long)]
    pub host: Option<String>,
    /// Limit the number of shares returned
    #[arg(long, value_name = "NUM_SHARES")]
    pub limit: Option<u32>,
    /// The last share ID of the previous page
    #[arg(long)]
    pub marker: Option<String>,
    /// Sort output by keys and directions, e.g. name:asc,size:desc
    #[arg(long, value_name = "KEY[:DIRECTION]", default_value = "name:asc")]
    pub sort: String,
    /// Filter results matching a name pattern (API >= 2.36)
    #[arg(long = "name~", value_name = "NAME~")]
    pub name_pattern: Option<String>,
    /// Filter results matching a description pattern (API >= 2.36)
    #[arg(long = "description~", value_name = "DESCRIPTION~")]
    pub description_pattern: Option<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Name or ID of the share to display
    pub share: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Name or ID of the share(s) to delete
    #[arg(required = true, num_args = 1..)]
    pub shares: Vec<String>,
    /// Delete the share(s) ignoring the current state (admin only)
    #[arg(long)]
    pub force: bool,
}

pub async fn run(command: ShareCommand, client: &ShareClient) -> Result<CommandOutput> {
    match command {
        ShareCommand::List(args) => list(client, &args).await,
        ShareCommand::Show(args) => {
            let share = find_resource(&ShareManager::new(client), &args.share).await?;
            Ok(show_output(share))
        }
        ShareCommand::Delete(args) => delete(client, &args).await,
    }
}

pub async fn list(client: &ShareClient, args: &ListArgs) -> Result<CommandOutput> {
    let mut opts = SearchOpts::new();
    opts.insert_opt("offset", args.marker.as_deref());
    opts.insert_opt("limit", args.limit);
    opts.insert_flag("all_tenants", args.all_projects);
    opts.insert_opt("name", args.name.as_deref());
    opts.insert_opt("status", args.status.as_deref());
    opts.insert_opt("host", args.host.as_deref());
    opts.insert_opt("name~", args.name_pattern.as_deref());
    opts.insert_opt("description~", args.description_pattern.as_deref());
    opts.insert_opt("description", args.description.as_deref());
    VersionGate::new(client.api_version()).check(&opts, PATTERN_FILTERS)?;

    let def = get_resource("shares").ok_or_else(|| ApiError::command("share definition missing"))?;
    let mut columns = def.columns.clone();
    if args.all_projects {
        columns.push("Project ID".to_string());
    }

    let mut shares = ShareManager::new(client).list(&opts, true).await?;
    sort_items(&mut shares, &args.sort)?;

    Ok(list_output(&columns, &shares))
}

pub async fn delete(client: &ShareClient, args: &DeleteArgs) -> Result<CommandOutput> {
    let manager = ShareManager::new(client);
    let manager = &manager;
    let force = args.force;

    let outcome = run_batch("delete share", &args.shares, move |target| async move {
        let share = find_resource(manager, &target).await?;
        if force {
            manager.force_delete(&share).await
        } else {
            manager.delete(&share).await
        }
    })
    .await;

    outcome.into_result("shares", "delete")?;
    Ok(CommandOutput::Nothing)
}
