//! `snapshot` commands

use super::{list_output, show_output};
use crate::api::client::ShareClient;
use crate::batch::{run_batch, CompoundOutcome};
use crate::error::{ApiError, Result};
use crate::output::{sort_items, CommandOutput};
use crate::resource::{
    find_resource, SearchOpts, ShareManager, ShareSnapshotManager, SnapshotStatus, SnapshotUpdate,
};
use crate::version_gate::{VersionGate, PATTERN_FILTERS};
use clap::{Args, Subcommand, ValueEnum};
use serde_json::Value;

#[derive(Subcommand, Debug)]
pub enum SnapshotCommand {
    /// Create a snapshot of the given share
    Create(CreateArgs),
    /// Delete one or more share snapshots
    Delete(DeleteArgs),
    /// Show details about a share snapshot
    Show(ShowArgs),
    /// Set share snapshot properties
    Set(SetArgs),
    /// Unset a share snapshot property
    Unset(UnsetArgs),
    /// List snapshots
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name or ID of the share to create snapshot of
    pub share: String,
    /// Snapshot the share even if it's busy
    #[arg(long)]
    pub force: bool,
    /// Add a name to the snapshot
    #[arg(long)]
    pub name: Option<String>,
    /// Add a description to the snapshot
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Name or ID of the snapshot(s) to delete
    #[arg(required = true, num_args = 1..)]
    pub snapshots: Vec<String>,
    /// Delete the snapshot(s) ignoring the current state
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Name or ID of the snapshot to display
    pub snapshot: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Name or ID of the snapshot to set a property for
    pub snapshot: String,
    /// Set a name to the snapshot
    #[arg(long)]
    pub name: Option<String>,
    /// Set a description to the snapshot
    #[arg(long)]
    pub description: Option<String>,
    /// Assign a status to the snapshot (admin only)
    #[arg(long, value_enum)]
    pub status: Option<SnapshotStatus>,
}

#[derive(Args, Debug)]
pub struct UnsetArgs {
    /// Name or ID of the snapshot to unset a property for
    pub snapshot: String,
    /// Unset snapshot name
    #[arg(long)]
    pub name: bool,
    /// Unset snapshot description
    #[arg(long)]
    pub description: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Usage {
    Used,
    Unused,
}

impl Usage {
    fn as_str(self) -> &'static str {
        match self {
            Usage::Used => "used",
            Usage::Unused => "unused",
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Display snapshots from all projects (admin only)
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
    /// Name or ID of a share to filter results by
    #[arg(long)]
    pub share: Option<String>,
    /// Filter snapshots by usage
    #[arg(long, value_enum)]
    pub usage: Option<Usage>,
    /// Limit the number of snapshots returned
    #[arg(long, value_name = "NUM_SNAPSHOTS")]
    pub limit: Option<u32>,
    /// The last snapshot ID of the previous page
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
    /// List share snapshots with details
    #[arg(long)]
    pub detail: bool,
}

pub async fn run(command: SnapshotCommand, client: &ShareClient) -> Result<CommandOutput> {
    match command {
        SnapshotCommand::Create(args) => create(client, &args).await,
        SnapshotCommand::Delete(args) => delete(client, &args).await,
        SnapshotCommand::Show(args) => show(client, &args).await,
        SnapshotCommand::Set(args) => set(client, &args).await,
        SnapshotCommand::Unset(args) => unset(client, &args).await,
        SnapshotCommand::List(args) => list(client, &args).await,
    }
}

pub async fn create(client: &ShareClient, args: &CreateArgs) -> Result<CommandOutput> {
    let share = find_resource(&ShareManager::new(client), &args.share).await?;

    let snapshot = ShareSnapshotManager::new(client)
        .create(
            &share,
            args.force,
            args.name.as_deref().filter(|s| !s.is_empty()),
            args.description.as_deref().filter(|s| !s.is_empty()),
        )
        .await?;

    Ok(show_output(snapshot))
}

pub async fn delete(client: &ShareClient, args: &DeleteArgs) -> Result<CommandOutput> {
    let manager = ShareSnapshotManager::new(client);
    let manager = &manager;
    let force = args.force;

    let outcome = run_batch("delete snapshot", &args.snapshots, move |target| async move {
        let snapshot = find_resource(manager, &target).await?;
        if force {
            manager.force_delete(&snapshot).await
        } else {
            manager.delete(&snapshot).await
        }
    })
    .await;

    outcome.into_result("snapshots", "delete")?;
    Ok(CommandOutput::Nothing)
}

pub async fn show(client: &ShareClient, args: &ShowArgs) -> Result<CommandOutput> {
    let manager = ShareSnapshotManager::new(client);
    let mut snapshot = find_resource(&manager, &args.snapshot).await?;

    if manager.supports_export_locations() {
        let locations = manager.export_locations(&snapshot).await?;
        snapshot.info_mut().insert(
            "export_locations".into(),
            Value::String(export_locations_view(&locations)),
        );
    }

    Ok(show_output(snapshot))
}

/// Flatten export locations into `key = value` lines, one block per location
fn export_locations_view(locations: &[Value]) -> String {
    locations
        .iter()
        .filter_map(|loc| loc.as_object())
        .map(|loc| {
            let mut lines: Vec<String> = loc
                .iter()
                .map(|(k, v)| match v {
                    Value::String(s) => format!("{} = {}", k, s),
                    other => format!("{} = {}", k, other),
                })
                .collect();
            lines.sort();
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub async fn set(client: &ShareClient, args: &SetArgs) -> Result<CommandOutput> {
    let manager = ShareSnapshotManager::new(client);
    let snapshot = find_resource(&manager, &args.snapshot).await?;

    let update = SnapshotUpdate {
        display_name: args.name.clone().map(Some),
        display_description: args.description.clone().map(Some),
    };

    let mut outcome = CompoundOutcome::new();
    outcome.record(
        &format!("set share snapshot properties {:?}", update),
        manager.update(&snapshot, &update).await,
    );

    if let Some(status) = args.status {
        outcome.record(
            &format!("update snapshot status to '{}'", status),
            manager.reset_state(&snapshot, status).await,
        );
    }

    outcome.into_result()?;
    Ok(CommandOutput::Nothing)
}

pub async fn unset(client: &ShareClient, args: &UnsetArgs) -> Result<CommandOutput> {
    let manager = ShareSnapshotManager::new(client);
    let snapshot = find_resource(&manager, &args.snapshot).await?;

    let update = SnapshotUpdate {
        display_name: args.name.then_some(None),
        display_description: args.description.then_some(None),
    };
    if update.is_empty() {
        return Ok(CommandOutput::Nothing);
    }

    manager.update(&snapshot, &update).await.map_err(|e| {
        ApiError::command(format!(
            "Failed to unset snapshot display name or display description: {}",
            e
        ))
    })?;
    Ok(CommandOutput::Nothing)
}

/// Search options for `snapshot list` before the share filter is resolved
pub fn list_search_opts(args: &ListArgs) -> SearchOpts {
    let mut opts = SearchOpts::new();
    opts.insert_opt("offset", args.marker.as_deref());
    opts.insert_opt("limit", args.limit);
    opts.insert_flag("all_tenants", args.all_projects);
    opts.insert_opt("name", args.name.as_deref());
    opts.insert_opt("status", args.status.as_deref());
    opts.insert_opt("usage", args.usage.map(Usage::as_str));
    opts.insert_opt("name~", args.name_pattern.as_deref());
    opts.insert_opt("description~", args.description_pattern.as_deref());
    opts.insert_opt("description", args.description.as_deref());
    opts
}

pub async fn list(client: &ShareClient, args: &ListArgs) -> Result<CommandOutput> {
    let mut opts = list_search_opts(args);
    VersionGate::new(client.api_version()).check(&opts, PATTERN_FILTERS)?;

    if let Some(share) = &args.share {
        let share = find_resource(&ShareManager::new(client), share).await?;
        opts.insert("share_id", share.id());
    }

    let manager = ShareSnapshotManager::new(client);
    let def = crate::resource::get_resource("snapshots")
        .ok_or_else(|| ApiError::command("snapshot definition missing"))?;

    let mut columns = def.columns.clone();
    if args.detail {
        columns.extend(def.detail_columns.iter().cloned());
    }
    if args.all_projects {
        columns.push("Project ID".to_string());
    }

    let mut snapshots = manager.list(&opts, true).await?;
    sort_items(&mut snapshots, &args.sort)?;

    Ok(list_output(&columns, &snapshots))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_opts_skip_unset_filters() {
        let args = ListArgs {
            status: Some("available".into()),
            sort: "name:asc".into(),
            ..Default::default()
        };
        let opts = list_search_opts(&args);
        assert_eq!(opts.to_query(), "?status=available");
    }

    #[test]
    fn test_list_opts_carry_pattern_filters() {
        let args = ListArgs {
            name_pattern: Some("night".into()),
            description: Some("weekly".into()),
            usage: Some(Usage::Unused),
            all_projects: true,
            ..Default::default()
        };
        let opts = list_search_opts(&args);
        assert_eq!(opts.get("name~"), Some("night"));
        assert_eq!(opts.get("description"), Some("weekly"));
        assert_eq!(opts.get("usage"), Some("unused"));
        assert_eq!(opts.get("all_tenants"), Some("1"));
    }

    #[test]
    fn test_export_locations_view() {
        let view = export_locations_view(&[
            json!({"path": "10.0.0.5:/snap", "is_admin_only": false}),
            json!({"path": "10.0.0.6:/snap", "is_admin_only": true}),
        ]);
        assert_eq!(
            view,
            "is_admin_only = false\npath = 10.0.0.5:/snap\n\nis_admin_only = true\npath = 10.0.0.6:/snap"
        );
    }
}
