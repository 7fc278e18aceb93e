//! `service` commands

use super::list_output;
use crate::api::client::ShareClient;
use crate::error::{ApiError, Result};
use crate::output::CommandOutput;
use crate::resource::{get_resource, SearchOpts, ServiceManager};
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum ServiceCommand {
    /// List share services (admin only)
    List(ListArgs),
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub host: Option<String>,
    /// e.g. manila-share
    #[arg(long)]
    pub binary: Option<String>,
    /// Availability zone
    #[arg(long)]
    pub zone: Option<String>,
    /// enabled or disabled
    #[arg(long)]
    pub status: Option<String>,
    /// up or down
    #[arg(long)]
    pub state: Option<String>,
}

pub async fn run(command: ServiceCommand, client: &ShareClient) -> Result<CommandOutput> {
    match command {
        ServiceCommand::List(args) => {
            let mut opts = SearchOpts::new();
            opts.insert_opt("host", args.host.as_deref());
            opts.insert_opt("binary", args.binary.as_deref());
            opts.insert_opt("zone", args.zone.as_deref());
            opts.insert_opt("status", args.status.as_deref());
            opts.insert_opt("state", args.state.as_deref());

            let def = get_resource("services")
                .ok_or_else(|| ApiError::command("service definition missing"))?;
            let services = ServiceManager::new(client).list(&opts).await?;
            Ok(list_output(&def.columns, &services))
        }
    }
}
