//! Share servers
//!
//! A share server's `share_network` attribute is an alias for
//! `share_network_name` (see the registry alias table).

use super::fetcher::SearchOpts;
use super::manager::{Findable, Manager, Resource};
use super::registry::{resource_def, ResourceDef};
use crate::api::client::ShareClient;
use crate::error::Result;
use serde_json::{Map, Value};

/// Manage share servers
pub struct ShareServerManager<'c> {
    base: Manager<'c>,
}

impl<'c> ShareServerManager<'c> {
    pub fn new(client: &'c ShareClient) -> Self {
        Self {
            base: Manager::new(client, resource_def("share_servers")),
        }
    }

    /// Get a share server, with each `backend_details` entry copied to a
    /// top-level `details:<key>` attribute
    pub async fn get(&self, id: &str) -> Result<Resource> {
        let mut server = self.base.get(id).await?;
        flatten_backend_details(&mut server);
        Ok(server)
    }

    /// Backend details of a share server
    pub async fn details(&self, server: &Resource) -> Result<Map<String, Value>> {
        let path = format!("{}/details", self.base.item_path(server.id()));
        let body = self.base.client().get(&path).await?;
        Ok(body
            .get("details")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default())
    }

    pub async fn list(&self, opts: &SearchOpts) -> Result<Vec<Resource>> {
        self.base.list(opts, false).await
    }

    pub async fn delete(&self, server: &Resource) -> Result<()> {
        self.base.delete(server.id()).await
    }
}

fn flatten_backend_details(server: &mut Resource) {
    let details = server
        .info()
        .get("backend_details")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let info = server.info_mut();
    for (key, value) in details {
        info.insert(format!("details:{}", key), value);
    }
}

impl Findable for ShareServerManager<'_> {
    fn resource_def(&self) -> &'static ResourceDef {
        self.base.def()
    }

    async fn get(&self, id: &str) -> Result<Resource> {
        ShareServerManager::get(self, id).await
    }

    /// Share servers have no names; only IDs resolve
    async fn search_by_name(&self, _name: &str) -> Result<Vec<Resource>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_backend_details() {
        let mut server = Resource::from_value(
            resource_def("share_servers"),
            json!({
                "id": "srv1",
                "backend_details": {"instance_id": "i-1", "ip": "10.0.0.5"}
            }),
        )
        .unwrap();

        flatten_backend_details(&mut server);

        assert_eq!(server.attr_display("details:instance_id"), "i-1");
        assert_eq!(server.attr_display("details:ip"), "10.0.0.5");
        assert!(server.attr("backend_details").is_some());
    }

    #[test]
    fn test_flatten_without_details_is_noop() {
        let mut server =
            Resource::from_value(resource_def("share_servers"), json!({"id": "srv1"})).unwrap();
        let before = server.clone();
        flatten_backend_details(&mut server);
        assert_eq!(server, before);
    }
}
