//! Configuration Management
//!
//! Connection defaults stored in `<config dir>/manila/config.json`. Command
//! line flags and `OS_*` environment variables take precedence over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Keystone v3 URL
    #[serde(default)]
    pub auth_url: Option<String>,
    /// Share API endpoint, skipping the catalog lookup
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub user_domain_name: Option<String>,
    #[serde(default)]
    pub project_domain_name: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    /// Requested API microversion, e.g. "2.36"
    #[serde(default)]
    pub api_version: Option<String>,
    /// HTTP timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: Option<bool>,
}

impl Config {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
    pub const DEFAULT_DOMAIN: &'static str = "Default";

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("manila").join("config.json"))
    }

    /// Load configuration from the default location, empty when absent
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Effective timeout (config > default)
    pub fn effective_timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(Self::DEFAULT_TIMEOUT_SECS)
    }

    /// Effective user domain (config > default)
    pub fn effective_user_domain(&self) -> String {
        self.user_domain_name
            .clone()
            .unwrap_or_else(|| Self::DEFAULT_DOMAIN.to_string())
    }

    /// Effective project domain (config > default)
    pub fn effective_project_domain(&self) -> String {
        self.project_domain_name
            .clone()
            .unwrap_or_else(|| Self::DEFAULT_DOMAIN.to_string())
    }
}

/// Prefer the command line / environment value, then the config file
pub fn pick(cli: &Option<String>, file: &Option<String>) -> Option<String> {
    cli.clone().or_else(|| file.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.effective_timeout_secs(), 60);
        assert_eq!(config.effective_user_domain(), "Default");
        assert_eq!(config.effective_project_domain(), "Default");
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("manila-cli-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"auth_url": "http://keystone:5000/v3", "api_version": "2.36", "timeout_secs": 5}}"#
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.auth_url.as_deref(), Some("http://keystone:5000/v3"));
        assert_eq!(config.api_version.as_deref(), Some("2.36"));
        assert_eq!(config.effective_timeout_secs(), 5);
        assert!(config.endpoint.is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_from_rejects_bad_json() {
        let dir = std::env::temp_dir().join(format!("manila-cli-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(Config::load_from(&path).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_pick_precedence() {
        let cli = Some("cli".to_string());
        let file = Some("file".to_string());
        assert_eq!(pick(&cli, &file).as_deref(), Some("cli"));
        assert_eq!(pick(&None, &file).as_deref(), Some("file"));
        assert_eq!(pick(&None, &None), None);
    }
}
