//! Shares

use super::fetcher::SearchOpts;
use super::manager::{Findable, Manager, Resource};
use super::registry::{resource_def, ResourceDef};
use crate::api::client::ShareClient;
use crate::error::Result;
use serde_json::Value;

/// Manage shares
pub struct ShareManager<'c> {
    base: Manager<'c>,
}

impl<'c> ShareManager<'c> {
    pub fn new(client: &'c ShareClient) -> Self {
        Self {
            base: Manager::new(client, resource_def("shares")),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Resource> {
        self.base.get(id).await
    }

    pub async fn list(&self, opts: &SearchOpts, detailed: bool) -> Result<Vec<Resource>> {
        self.base.list(opts, detailed).await
    }

    pub async fn delete(&self, share: &Resource) -> Result<()> {
        self.base.delete(share.id()).await
    }

    /// Delete regardless of state (admin only)
    pub async fn force_delete(&self, share: &Resource) -> Result<()> {
        let action = self.base.gate().prefixed("force_delete");
        self.base
            .action(share.id(), &action, Value::Null)
            .await
            .map(|_| ())
    }
}

impl Findable for ShareManager<'_> {
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
