//! Share types and their extra specs

use super::fetcher::SearchOpts;
use super::manager::{Findable, Manager, Resource};
use super::registry::{resource_def, ResourceDef};
use crate::api::client::ShareClient;
use crate::batch::{run_batch, BatchOutcome};
use crate::error::Result;
use crate::version_gate::Feature;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Manage share types
pub struct ShareTypeManager<'c> {
    base: Manager<'c>,
}

impl<'c> ShareTypeManager<'c> {
    pub fn new(client: &'c ShareClient) -> Self {
        Self {
            base: Manager::new(client, resource_def("share_types")),
        }
    }

    pub async fn list(&self) -> Result<Vec<Resource>> {
        self.base.list(&SearchOpts::new(), false).await
    }

    pub async fn get(&self, id: &str) -> Result<Resource> {
        self.base.get(id).await
    }

    pub async fn delete(&self, share_type: &Resource) -> Result<()> {
        self.base.delete(share_type.id()).await
    }

    /// Create a share type
    pub async fn create(
        &self,
        name: &str,
        is_public: bool,
        extra_specs: &BTreeMap<String, String>,
    ) -> Result<Resource> {
        let access_key = if self.base.gate().supports(Feature::UnprefixedNames) {
            "share_type_access:is_public"
        } else {
            "os-share-type-access:is_public"
        };
        let mut fields = Map::new();
        fields.insert("name".into(), json!(name));
        fields.insert(access_key.into(), json!(is_public));
        fields.insert("extra_specs".into(), json!(extra_specs));

        self.base.create(Value::Object(fields)).await
    }

    fn extra_specs_path(&self, share_type: &Resource) -> String {
        format!("{}/extra_specs", self.base.item_path(share_type.id()))
    }

    /// Get extra specs of a share type
    pub async fn get_keys(&self, share_type: &Resource) -> Result<Map<String, Value>> {
        let body = self
            .base
            .client()
            .get(&self.extra_specs_path(share_type))
            .await?;
        Ok(body
            .get("extra_specs")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default())
    }

    /// Set extra specs on a share type
    pub async fn set_keys(
        &self,
        share_type: &Resource,
        specs: &BTreeMap<String, String>,
    ) -> Result<Map<String, Value>> {
        let body = json!({ "extra_specs": specs });
        let response = self
            .base
            .client()
            .post(&self.extra_specs_path(share_type), &body)
            .await?;
        Ok(response
            .get("extra_specs")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default())
    }

    /// Unset extra specs, one request per key. Every key is attempted even
    /// after a failure.
    pub async fn unset_keys(&self, share_type: &Resource, keys: &[String]) -> BatchOutcome {
        let client = self.base.client();
        let specs_path = self.extra_specs_path(share_type);
        let specs_path = specs_path.as_str();

        run_batch("unset extra spec", keys, move |key| async move {
            let path = format!("{}/{}", specs_path, urlencoding::encode(&key));
            client.delete(&path).await
        })
        .await
    }
}

impl Findable for ShareTypeManager<'_> {
    fn resource_def(&self) -> &'static ResourceDef {
        self.base.def()
    }

    async fn get(&self, id: &str) -> Result<Resource> {
        self.base.get(id).await
    }

    /// The types collection takes no name filter; match client side
    async fn search_by_name(&self, name: &str) -> Result<Vec<Resource>> {
        self.base.search_by_name(name).await
    }
}
