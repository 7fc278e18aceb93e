//! Resource handles, the shared manager plumbing and name-or-ID resolution.

use super::fetcher::{self, display_value, extract_json_value, SearchOpts};
use super::registry::ResourceDef;
use crate::api::client::ShareClient;
use crate::error::{ApiError, Result};
use crate::version_gate::{Feature, VersionGate};
use serde_json::{Map, Value};

/// A server-side resource: its ID plus the attributes the server returned
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    def: &'static ResourceDef,
    info: Map<String, Value>,
}

impl Resource {
    pub fn new(def: &'static ResourceDef, info: Map<String, Value>) -> Self {
        Self { def, info }
    }

    /// Wrap a JSON object, rejecting anything else
    pub fn from_value(def: &'static ResourceDef, value: Value) -> Result<Self> {
        match value {
            Value::Object(info) => Ok(Self::new(def, info)),
            other => Err(ApiError::MalformedResponse(format!(
                "expected a {} object, got {}",
                def.display_name, other
            ))),
        }
    }

    pub fn def(&self) -> &'static ResourceDef {
        self.def
    }

    pub fn id(&self) -> &str {
        self.info.get("id").and_then(|v| v.as_str()).unwrap_or("")
    }

    pub fn name(&self) -> Option<&str> {
        self.attr(&self.def.name_field).and_then(|v| v.as_str())
    }

    /// Attribute lookup that falls back to the alias table of the resource type
    pub fn attr(&self, field: &str) -> Option<&Value> {
        self.info.get(field).or_else(|| {
            self.def
                .aliases_for(field)
                .iter()
                .find_map(|alias| self.info.get(alias))
        })
    }

    /// Attribute rendered for display, `None` when absent. Dotted fields
    /// such as `backend_details.ip` reach into nested objects.
    pub fn attr_display(&self, field: &str) -> String {
        if let Some(value) = self.attr(field) {
            return display_value(Some(value));
        }
        match field.split_once('.') {
            Some((head, rest)) => self
                .attr(head)
                .map(|value| extract_json_value(value, rest))
                .unwrap_or_else(|| display_value(None)),
            None => display_value(None),
        }
    }

    pub fn info(&self) -> &Map<String, Value> {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.info
    }

    pub fn into_info(self) -> Map<String, Value> {
        self.info
    }
}

/// Request plumbing shared by every resource manager
pub struct Manager<'c> {
    client: &'c ShareClient,
    def: &'static ResourceDef,
}

impl<'c> Manager<'c> {
    pub fn new(client: &'c ShareClient, def: &'static ResourceDef) -> Self {
        Self { client, def }
    }

    pub fn client(&self) -> &'c ShareClient {
        self.client
    }

    pub fn def(&self) -> &'static ResourceDef {
        self.def
    }

    pub fn gate(&self) -> VersionGate {
        VersionGate::new(self.client.api_version())
    }

    /// Collection path for the negotiated version
    pub fn base_path(&self) -> &'static str {
        let def = self.def;
        match &def.legacy_path {
            Some(legacy) if !self.gate().supports(Feature::UnprefixedNames) => legacy.as_str(),
            _ => def.path.as_str(),
        }
    }

    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.base_path(), urlencoding::encode(id))
    }

    fn unwrap_resource(&self, body: Value) -> Result<Resource> {
        let Value::Object(mut map) = body else {
            return Err(ApiError::MalformedResponse(format!(
                "expected an object wrapping '{}'",
                self.def.resource_key
            )));
        };
        let inner = map.remove(&self.def.resource_key).ok_or_else(|| {
            ApiError::MalformedResponse(format!("missing '{}' in response", self.def.resource_key))
        })?;
        Resource::from_value(self.def, inner)
    }

    pub async fn get_at(&self, path: &str) -> Result<Resource> {
        let body = self.client.get(path).await?;
        self.unwrap_resource(body)
    }

    pub async fn list_at(&self, path: &str, opts: &SearchOpts) -> Result<Vec<Resource>> {
        fetcher::fetch_resources(self.client, self.def, path, opts).await
    }

    /// List from `<path>/detail` when the resource has one
    pub async fn list(&self, opts: &SearchOpts, detailed: bool) -> Result<Vec<Resource>> {
        let path = if detailed && self.def.has_detail {
            format!("{}/detail", self.base_path())
        } else {
            self.base_path().to_string()
        };
        self.list_at(&path, opts).await
    }

    pub async fn get(&self, id: &str) -> Result<Resource> {
        self.get_at(&self.item_path(id)).await
    }

    /// POST `{resource_key: fields}` to the collection
    pub async fn create(&self, fields: Value) -> Result<Resource> {
        let body = wrap(&self.def.resource_key, fields);
        let response = self.client.post(self.base_path(), &body).await?;
        self.unwrap_resource(response)
    }

    /// PUT `{resource_key: fields}` to the item
    pub async fn update(&self, id: &str, fields: Value) -> Result<Resource> {
        let body = wrap(&self.def.resource_key, fields);
        let response = self.client.put(&self.item_path(id), &body).await?;
        self.unwrap_resource(response)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&self.item_path(id)).await
    }

    /// Name lookup candidates: a server-side `name` filter where the
    /// collection accepts one, the whole collection otherwise
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Resource>> {
        if self.def.name_filter {
            self.list(&SearchOpts::new().with("name", name), true).await
        } else {
            self.list(&SearchOpts::new(), false).await
        }
    }

    /// POST `{action: info}` to `<item>/action`
    pub async fn action(&self, id: &str, action: &str, info: Value) -> Result<Value> {
        let path = format!("{}/action", self.item_path(id));
        self.client.post(&path, &wrap(action, info)).await
    }
}

fn wrap(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Managers whose resources can be addressed by ID or by name
#[allow(async_fn_in_trait)]
pub trait Findable {
    fn resource_def(&self) -> &'static ResourceDef;

    /// Direct lookup by ID
    async fn get(&self, id: &str) -> Result<Resource>;

    /// Candidates for a name match; may contain non-matching entries
    async fn search_by_name(&self, name: &str) -> Result<Vec<Resource>>;
}

/// Resolve a user-supplied name or ID to exactly one resource.
///
/// An ID hit always wins. On a 404/400 miss the name search runs, and anything
/// other than exactly one exact-name match is an error.
pub async fn find_resource<M: Findable>(manager: &M, name_or_id: &str) -> Result<Resource> {
    match manager.get(name_or_id).await {
        Ok(resource) => return Ok(resource),
        Err(e) if e.is_lookup_miss() => {
            tracing::debug!(
                "No {} with ID '{}', searching by name",
                manager.resource_def().display_name,
                name_or_id
            );
        }
        Err(e) => return Err(e),
    }

    let mut matches: Vec<Resource> = manager
        .search_by_name(name_or_id)
        .await?
        .into_iter()
        .filter(|r| r.name() == Some(name_or_id))
        .collect();

    if matches.len() == 1 {
        if let Some(found) = matches.pop() {
            return Ok(found);
        }
    }

    Err(ApiError::AmbiguousOrNotFoundResource {
        kind: manager.resource_def().display_name.clone(),
        name_or_id: name_or_id.to_string(),
        matches: matches.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::registry::get_resource;
    use serde_json::json;

    fn resource(key: &str, value: Value) -> Resource {
        Resource::from_value(get_resource(key).unwrap(), value).unwrap()
    }

    #[test]
    fn test_alias_accessor() {
        let server = resource(
            "share_servers",
            json!({"id": "srv1", "share_network_name": "net-a"}),
        );
        assert_eq!(server.attr_display("share_network"), "net-a");
        assert_eq!(server.attr_display("host"), "None");
    }

    #[test]
    fn test_own_attribute_beats_alias() {
        let server = resource(
            "share_servers",
            json!({"id": "srv1", "share_network": "direct", "share_network_name": "alias"}),
        );
        assert_eq!(server.attr_display("share_network"), "direct");
    }

    #[test]
    fn test_dotted_attribute_reaches_nested_values() {
        let server = resource(
            "share_servers",
            json!({"id": "srv1", "backend_details": {"ip": "10.0.0.9"}}),
        );
        assert_eq!(server.attr_display("backend_details.ip"), "10.0.0.9");
        assert_eq!(server.attr_display("backend_details.port"), "None");
    }

    #[test]
    fn test_alias_candidates_in_order() {
        let legacy = resource(
            "share_types",
            json!({"id": "t1", "os-share-type-access:is_public": true}),
        );
        assert_eq!(legacy.attr_display("is_public"), "true");
    }

    #[test]
    fn test_id_and_name() {
        let snap = resource("snapshots", json!({"id": "s1", "name": "nightly"}));
        assert_eq!(snap.id(), "s1");
        assert_eq!(snap.name(), Some("nightly"));
        assert_eq!(snap.attr_display("display_name"), "nightly");
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        let def = get_resource("snapshots").unwrap();
        assert!(Resource::from_value(def, json!(["s1"])).is_err());
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("snapshot", json!({"name": "a"})), json!({"snapshot": {"name": "a"}}));
    }
}
