//! Share snapshots

use super::fetcher::SearchOpts;
use super::manager::{Findable, Manager, Resource};
use super::registry::{resource_def, ResourceDef};
use crate::api::client::ShareClient;
use crate::error::{ApiError, Result};
use crate::version_gate::Feature;
use clap::ValueEnum;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// States an administrator may force a snapshot into
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum SnapshotStatus {
    Available,
    Error,
    Creating,
    Deleting,
    ManageStarting,
    ManageError,
    UnmanageStarting,
    UnmanageError,
    ErrorDeleting,
}

impl SnapshotStatus {
    pub const ALL: [SnapshotStatus; 9] = [
        SnapshotStatus::Available,
        SnapshotStatus::Error,
        SnapshotStatus::Creating,
        SnapshotStatus::Deleting,
        SnapshotStatus::ManageStarting,
        SnapshotStatus::ManageError,
        SnapshotStatus::UnmanageStarting,
        SnapshotStatus::UnmanageError,
        SnapshotStatus::ErrorDeleting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SnapshotStatus::Available => "available",
            SnapshotStatus::Error => "error",
            SnapshotStatus::Creating => "creating",
            SnapshotStatus::Deleting => "deleting",
            SnapshotStatus::ManageStarting => "manage_starting",
            SnapshotStatus::ManageError => "manage_error",
            SnapshotStatus::UnmanageStarting => "unmanage_starting",
            SnapshotStatus::UnmanageError => "unmanage_error",
            SnapshotStatus::ErrorDeleting => "error_deleting",
        }
    }
}

impl fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|st| st.as_str()).collect();
                ApiError::command(format!(
                    "Invalid snapshot status '{}', expected one of: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

/// Display fields that can be set or cleared on a snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotUpdate {
    pub display_name: Option<Option<String>>,
    pub display_description: Option<Option<String>>,
}

impl SnapshotUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.display_description.is_none()
    }

    fn to_body(&self) -> Value {
        let mut map = Map::new();
        if let Some(name) = &self.display_name {
            map.insert("display_name".into(), json!(name));
        }
        if let Some(description) = &self.display_description {
            map.insert("display_description".into(), json!(description));
        }
        Value::Object(map)
    }
}

/// Manage share snapshots
pub struct ShareSnapshotManager<'c> {
    base: Manager<'c>,
}

impl<'c> ShareSnapshotManager<'c> {
    pub fn new(client: &'c ShareClient) -> Self {
        Self {
            base: Manager::new(client, resource_def("snapshots")),
        }
    }

    pub async fn create(
        &self,
        share: &Resource,
        force: bool,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Resource> {
        self.base
            .create(json!({
                "share_id": share.id(),
                "force": force,
                "name": name,
                "description": description,
            }))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Resource> {
        self.base.get(id).await
    }

    pub async fn list(&self, opts: &SearchOpts, detailed: bool) -> Result<Vec<Resource>> {
        self.base.list(opts, detailed).await
    }

    /// Update display fields; an empty update sends nothing
    pub async fn update(&self, snapshot: &Resource, update: &SnapshotUpdate) -> Result<Resource> {
        if update.is_empty() {
            return Ok(snapshot.clone());
        }
        self.base.update(snapshot.id(), update.to_body()).await
    }

    pub async fn delete(&self, snapshot: &Resource) -> Result<()> {
        self.base.delete(snapshot.id()).await
    }

    /// Delete regardless of state (admin only)
    pub async fn force_delete(&self, snapshot: &Resource) -> Result<()> {
        let action = self.base.gate().prefixed("force_delete");
        self.base
            .action(snapshot.id(), &action, Value::Null)
            .await
            .map(|_| ())
    }

    /// Force the snapshot status (admin only)
    pub async fn reset_state(&self, snapshot: &Resource, status: SnapshotStatus) -> Result<()> {
        let action = self.base.gate().prefixed("reset_status");
        self.base
            .action(snapshot.id(), &action, json!({ "status": status.as_str() }))
            .await
            .map(|_| ())
    }

    /// Export locations of a mountable snapshot
    pub async fn export_locations(&self, snapshot: &Resource) -> Result<Vec<Value>> {
        self.base.gate().require(Feature::SnapshotExportLocations)?;

        let path = format!("{}/export-locations", self.base.item_path(snapshot.id()));
        let body = self.base.client().get(&path).await?;
        Ok(body
            .get("share_snapshot_export_locations")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default())
    }

    /// Whether the server can report export locations at all
    pub fn supports_export_locations(&self) -> bool {
        self.base.gate().supports(Feature::SnapshotExportLocations)
    }
}

impl Findable for ShareSnapshotManager<'_> {
    fn resource_def(&self) -> &'static ResourceDef {
        self.base.def()
    }

    async fn get(&self, id: &str) -> Result<Resource> {
        self.base.get(id).await
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<Resource>> {
        self.base.search_by_name(name).await
    }
}
