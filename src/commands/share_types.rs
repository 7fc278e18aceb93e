//! `type` commands

use super::{list_output, parse_key_value, show_output, to_spec_map};
use crate::api::client::ShareClient;
use crate::batch::run_batch;
use crate::error::{ApiError, Result};
use crate::output::{CommandOutput, Detail};
use crate::resource::{find_resource, get_resource, ShareTypeManager};
use clap::{Args, Subcommand};
use serde_json::Value;

#[derive(Subcommand, Debug)]
pub enum TypeCommand {
    /// List share types
    List,
    /// Show a share type and its extra specs
    Show(TypeArg),
    /// Create a share type
    Create(CreateArgs),
    /// Delete one or more share types
    Delete(DeleteArgs),
    /// Set extra specs on a share type
    Set(SetArgs),
    /// Unset extra specs of a share type
    Unset(UnsetArgs),
}

#[derive(Args, Debug)]
pub struct TypeArg {
    /// Name or ID of the share type
    pub share_type: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Share type name
    pub name: String,
    /// Whether the type is visible to all projects
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub public: bool,
    /// Extra spec as <key>=<value>; repeat for more
    #[arg(long = "spec", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub specs: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Name or ID of the share type(s) to delete
    #[arg(required = true, num_args = 1..)]
    pub share_types: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Name or ID of the share type
    pub share_type: String,
    /// Extra spec as <key>=<value>; repeat for more
    #[arg(long = "spec", value_name = "KEY=VALUE", required = true, value_parser = parse_key_value)]
    pub specs: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct UnsetArgs {
    /// Name or ID of the share type
    pub share_type: String,
    /// Extra spec key(s) to remove
    #[arg(required = true, num_args = 1..)]
    pub keys: Vec<String>,
}

pub async fn run(command: TypeCommand, client: &ShareClient) -> Result<CommandOutput> {
    let manager = ShareTypeManager::new(client);
    match command {
        TypeCommand::List => {
            let def = get_resource("share_types")
                .ok_or_else(|| ApiError::command("share type definition missing"))?;
            let types = manager.list().await?;
            Ok(list_output(&def.columns, &types))
        }
        TypeCommand::Show(args) => {
            let mut share_type = find_resource(&manager, &args.share_type).await?;
            let specs = manager.get_keys(&share_type).await?;
            share_type
                .info_mut()
                .insert("extra_specs".into(), Value::Object(specs));
            Ok(show_output(share_type))
        }
        TypeCommand::Create(args) => {
            let created = manager
                .create(&args.name, args.public, &to_spec_map(&args.specs))
                .await?;
            Ok(show_output(created))
        }
        TypeCommand::Delete(args) => {
            let manager = &manager;
            let outcome = run_batch("delete share type", &args.share_types, move |target| async move {
                let share_type = find_resource(manager, &target).await?;
                manager.delete(&share_type).await
            })
            .await;
            outcome.into_result("share types", "delete")?;
            Ok(CommandOutput::Nothing)
        }
        TypeCommand::Set(args) => {
            let share_type = find_resource(&manager, &args.share_type).await?;
            let specs = manager
                .set_keys(&share_type, &to_spec_map(&args.specs))
                .await?;
            Ok(CommandOutput::Detail(Detail::from_map(&specs)))
        }
        TypeCommand::Unset(args) => {
            let share_type = find_resource(&manager, &args.share_type).await?;
            manager
                .unset_keys(&share_type, &args.keys)
                .await
                .into_result("extra specs", "unset")?;
            Ok(CommandOutput::Nothing)
        }
    }
}
