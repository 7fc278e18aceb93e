//! `quota` commands

use super::show_output;
use crate::api::client::ShareClient;
use crate::error::Result;
use crate::output::CommandOutput;
use crate::resource::{QuotaScope, QuotaSetManager, QuotaUpdate};
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum QuotaCommand {
    /// Show quotas of a project
    Show(ShowArgs),
    /// Set quotas of a project
    Set(SetArgs),
    /// Revert quotas of a project to their defaults
    Delete(ScopeArgs),
}

#[derive(Args, Debug, Default)]
pub struct ScopeArgs {
    /// Project ID
    pub project: String,
    /// Narrow to one user of the project
    #[arg(long, conflicts_with = "share_type")]
    pub user: Option<String>,
    /// Narrow to one share type of the project (API >= 2.39)
    #[arg(long)]
    pub share_type: Option<String>,
}

impl ScopeArgs {
    fn scope(&self) -> QuotaScope {
        QuotaScope {
            user_id: self.user.clone(),
            share_type: self.share_type.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
    /// Show the default quotas instead
    #[arg(long, conflicts_with_all = ["user", "share_type"])]
    pub defaults: bool,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
    #[arg(long)]
    pub shares: Option<i64>,
    #[arg(long)]
    pub snapshots: Option<i64>,
    #[arg(long)]
    pub gigabytes: Option<i64>,
    #[arg(long)]
    pub snapshot_gigabytes: Option<i64>,
    #[arg(long)]
    pub share_networks: Option<i64>,
    /// Apply even if current usage exceeds the new limit
    #[arg(long)]
    pub force: bool,
}

impl SetArgs {
    fn update(&self) -> QuotaUpdate {
        QuotaUpdate {
            shares: self.shares,
            snapshots: self.snapshots,
            gigabytes: self.gigabytes,
            snapshot_gigabytes: self.snapshot_gigabytes,
            share_networks: self.share_networks,
            force: self.force,
        }
    }
}

pub async fn run(command: QuotaCommand, client: &ShareClient) -> Result<CommandOutput> {
    let manager = QuotaSetManager::new(client);
    match command {
        QuotaCommand::Show(args) => {
            let quotas = if args.defaults {
                manager.defaults(&args.scope.project).await?
            } else {
                manager.get(&args.scope.project, &args.scope.scope()).await?
            };
            Ok(show_output(quotas))
        }
        QuotaCommand::Set(args) => {
            let quotas = manager
                .update(&args.scope.project, &args.scope.scope(), &args.update())
                .await?;
            Ok(show_output(quotas))
        }
        QuotaCommand::Delete(args) => {
            manager.delete(&args.project, &args.scope()).await?;
            Ok(CommandOutput::Nothing)
        }
    }
}
