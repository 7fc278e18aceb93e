//! API microversions
//!
//! A version is a `major.minor` pair compared numerically, so `2.9 < 2.10`.

use crate::error::{ApiError, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Header carrying the requested microversion on every call
pub const VERSION_HEADER: &str = "X-OpenStack-Manila-API-Version";

/// Oldest microversion this client speaks
pub const MIN_API_VERSION: ApiVersion = ApiVersion::new(2, 0);

/// Newest microversion this client speaks
pub const MAX_API_VERSION: ApiVersion = ApiVersion::new(2, 65);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ApiError::command(format!("Invalid API version '{}'", s));

        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        let major = major.parse::<u32>().map_err(|_| invalid())?;
        let minor = minor.parse::<u32>().map_err(|_| invalid())?;

        Ok(Self::new(major, minor))
    }
}

/// One entry of the versions document served at the endpoint root
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub min_version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionsDocument {
    #[serde(default)]
    pub versions: Vec<VersionInfo>,
}

impl VersionsDocument {
    /// Supported (min, max) microversion range of the v2 API, if published
    pub fn v2_range(&self) -> Option<(ApiVersion, ApiVersion)> {
        let info = self.versions.iter().find(|v| v.id.starts_with("v2"))?;
        let max = info.version.parse().ok()?;
        let min = info.min_version.parse().unwrap_or(MIN_API_VERSION);
        Some((min, max))
    }
}

/// Pick the session version from what the user asked for and what the server
/// advertises.
pub fn negotiate(
    requested: Option<ApiVersion>,
    server_range: Option<(ApiVersion, ApiVersion)>,
) -> Result<ApiVersion> {
    if let Some(requested) = requested {
        if requested < MIN_API_VERSION || requested > MAX_API_VERSION {
            return Err(ApiError::command(format!(
                "API version {} is not supported by this client (supported: {} - {})",
                requested, MIN_API_VERSION, MAX_API_VERSION
            )));
        }
    }

    let Some((server_min, server_max)) = server_range else {
        let fallback = requested.unwrap_or(MIN_API_VERSION);
        tracing::warn!(
            "Server did not publish API versions, using {}",
            fallback
        );
        return Ok(fallback);
    };

    match requested {
        Some(requested) if requested < server_min || requested > server_max => {
            Err(ApiError::command(format!(
                "API version {} is not supported by the server (supported: {} - {})",
                requested, server_min, server_max
            )))
        }
        Some(requested) => Ok(requested),
        None => {
            let version = MAX_API_VERSION.min(server_max);
            if version < server_min {
                return Err(ApiError::command(format!(
                    "No API version in common with the server (server: {} - {}, client: {} - {})",
                    server_min, server_max, MIN_API_VERSION, MAX_API_VERSION
                )));
            }
            Ok(version)
        }
    }
}
