//! Resource Fetcher
//!
//! Builds list queries from search options and walks paginated collections.

use super::manager::Resource;
use super::registry::ResourceDef;
use crate::api::client::ShareClient;
use crate::error::{ApiError, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Filter options for a list request.
///
/// Keys are kept sorted so the query string is stable. Unset, empty and
/// `false` values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOpts(BTreeMap<String, String>);

impl SearchOpts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`SearchOpts::insert`]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.0.insert(key.to_string(), value);
        }
    }

    /// Insert only when a value was given
    pub fn insert_opt<T: ToString>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.insert(key, value.to_string());
        }
    }

    /// Boolean flags are sent as `1` when set and omitted otherwise
    pub fn insert_flag(&mut self, key: &str, enabled: bool) {
        if enabled {
            self.insert(key, "1");
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as `?k=v&...`, or an empty string when there are no options
    pub fn to_query(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        format!("?{}", parts.join("&"))
    }
}

/// Result of fetching one page
pub struct PaginatedResult {
    pub items: Vec<Resource>,
    pub next_link: Option<String>,
}

/// Fetch a collection, following `next` links unless the caller set `limit`
pub async fn fetch_resources(
    client: &ShareClient,
    def: &'static ResourceDef,
    base_path: &str,
    opts: &SearchOpts,
) -> Result<Vec<Resource>> {
    let mut all_items = Vec::new();
    let mut url = format!("{}{}", base_path, opts.to_query());
    let single_page = opts.contains("limit");

    loop {
        let result = fetch_resources_paginated(client, def, &url).await?;
        all_items.extend(result.items);

        match result.next_link {
            Some(next) if client.url(&next) == client.url(&url) => {
                tracing::warn!("Next page link repeats {}, stopping", next);
                break;
            }
            Some(next) if !single_page => url = next,
            _ => break,
        }
    }

    Ok(all_items)
}

/// Fetch one page of a collection
pub async fn fetch_resources_paginated(
    client: &ShareClient,
    def: &'static ResourceDef,
    url: &str,
) -> Result<PaginatedResult> {
    let response = client.get(url).await?;

    let items = extract_items(&response, def)?;
    let next_link = next_link(&response, &def.collection_key);

    Ok(PaginatedResult { items, next_link })
}

/// Extract the list of resources wrapped under the collection key
fn extract_items(response: &Value, def: &'static ResourceDef) -> Result<Vec<Resource>> {
    let Some(items) = response.get(&def.collection_key) else {
        return Err(ApiError::MalformedResponse(format!(
            "missing '{}' in response",
            def.collection_key
        )));
    };

    items
        .as_array()
        .ok_or_else(|| {
            ApiError::MalformedResponse(format!("'{}' is not a list", def.collection_key))
        })?
        .iter()
        .cloned()
        .map(|item| Resource::from_value(def, item))
        .collect()
}

/// `href` of the `next` entry in `<collection>_links`
fn next_link(response: &Value, collection_key: &str) -> Option<String> {
    response
        .get(format!("{}_links", collection_key))?
        .as_array()?
        .iter()
        .find(|link| link.get("rel").and_then(|r| r.as_str()) == Some("next"))
        .and_then(|link| link.get("href"))
        .and_then(|href| href.as_str())
        .map(|s| s.to_string())
}

/// Render a JSON value as a table cell
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Extract a value from JSON using a dot-notation path
pub fn extract_json_value(item: &Value, path: &str) -> String {
    let mut current = item;

    for part in path.split('.') {
        // Handle array index
        let next = match part.parse::<usize>() {
            Ok(idx) => current.get(idx),
            Err(_) => current.get(part),
        };
        current = match next {
            Some(v) => v,
            None => return "None".to_string(),
        };
    }

    display_value(Some(current))
}
