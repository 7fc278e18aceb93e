//! Resource Registry - Load resource definitions from JSON
//!
//! This module loads the share API resource definitions from embedded JSON
//! files and provides lookup functions for the managers and commands.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/shares.json"),
    include_str!("../resources/admin.json"),
];

fn default_name_field() -> String {
    "name".to_string()
}

/// Resource definition from JSON
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceDef {
    /// Human name used in messages ("snapshot", "share server")
    pub display_name: String,
    /// Collection path, e.g. `/snapshots`
    pub path: String,
    /// `os-` prefixed path used before microversion 2.7
    #[serde(default)]
    pub legacy_path: Option<String>,
    /// Body key wrapping a single resource
    pub resource_key: String,
    /// Body key wrapping a list of resources
    pub collection_key: String,
    /// Whether `<path>/detail` exists
    #[serde(default)]
    pub has_detail: bool,
    /// Whether the server accepts a `name` filter on list
    #[serde(default)]
    pub name_filter: bool,
    #[serde(default = "default_name_field")]
    pub name_field: String,
    /// Attribute aliases, tried in order when the attribute itself is absent
    #[serde(default)]
    pub aliases: HashMap<String, Vec<String>>,
    /// Columns always listed
    #[serde(default)]
    pub columns: Vec<String>,
    /// Extra columns for `--detail` listings
    #[serde(default)]
    pub detail_columns: Vec<String>,
}

impl ResourceDef {
    /// Alternative attribute names for `field`
    pub fn aliases_for(&self, field: &str) -> &[String] {
        self.aliases.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get a resource definition that is known to be embedded
pub(crate) fn resource_def(key: &str) -> &'static ResourceDef {
    get_resource(key).unwrap_or_else(|| panic!("resource '{}' missing from registry", key))
}

/// Get all resource keys
pub fn get_all_resource_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect();
    keys.sort_unstable();
    keys
}
