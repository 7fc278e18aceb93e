//! API version gate
//!
//! Every minimum microversion the client cares about lives here. Commands ask
//! the gate before sending an optional parameter, and managers ask it which
//! flavor of a path or action name the server expects.

use crate::api::version::ApiVersion;
use crate::error::{ApiError, Result};
use crate::resource::SearchOpts;

/// An optional request parameter and the first version that accepts it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatedParam {
    pub name: &'static str,
    pub min_version: ApiVersion,
}

const fn gated(name: &'static str, major: u32, minor: u32) -> GatedParam {
    GatedParam {
        name,
        min_version: ApiVersion::new(major, minor),
    }
}

/// Pattern and description filters on share and snapshot listings
pub const PATTERN_FILTERS: &[GatedParam] = &[
    gated("name~", 2, 36),
    gated("description~", 2, 36),
    gated("description", 2, 36),
];

/// Share type filter on the scheduler pool listing
pub const POOL_FILTERS: &[GatedParam] = &[gated("share_type", 2, 23)];

/// Share type scoping of quota sets
pub const QUOTA_SCOPES: &[GatedParam] = &[gated("share_type", 2, 39)];

/// Behaviors that change shape with the microversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// `force_delete`/`reset_status` actions and `/quota-sets`, `/services`
    /// paths without the legacy `os-` prefix
    UnprefixedNames,
    SnapshotExportLocations,
}

impl Feature {
    pub const fn min_version(self) -> ApiVersion {
        match self {
            Feature::UnprefixedNames => ApiVersion::new(2, 7),
            Feature::SnapshotExportLocations => ApiVersion::new(2, 32),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Feature::UnprefixedNames => "unprefixed actions",
            Feature::SnapshotExportLocations => "snapshot export locations",
        }
    }
}

/// Checks requests against the negotiated version
#[derive(Debug, Clone, Copy)]
pub struct VersionGate {
    version: ApiVersion,
}

impl VersionGate {
    pub fn new(version: ApiVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn supports(&self, feature: Feature) -> bool {
        self.version >= feature.min_version()
    }

    pub fn require(&self, feature: Feature) -> Result<()> {
        if self.supports(feature) {
            return Ok(());
        }
        Err(ApiError::UnsupportedByVersion {
            params: vec![feature.name().to_string()],
            required: feature.min_version(),
            current: self.version,
        })
    }

    /// Legacy `os-` prefixed form of a name before 2.7
    pub fn prefixed(&self, name: &str) -> String {
        if self.supports(Feature::UnprefixedNames) {
            name.to_string()
        } else {
            format!("os-{}", name)
        }
    }

    /// Fail if `opts` carries any parameter from `gated` the session version
    /// cannot accept. Nothing is removed from `opts`; the call is refused.
    pub fn check(&self, opts: &SearchOpts, gated: &[GatedParam]) -> Result<()> {
        let rejected: Vec<&GatedParam> = gated
            .iter()
            .filter(|param| opts.contains(param.name) && self.version < param.min_version)
            .collect();

        let Some(required) = rejected.iter().map(|p| p.min_version).max() else {
            return Ok(());
        };

        Err(ApiError::UnsupportedByVersion {
            params: rejected.iter().map(|p| p.name.to_string()).collect(),
            required,
            current: self.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(minor: u32) -> VersionGate {
        VersionGate::new(ApiVersion::new(2, minor))
    }

    #[test]
    fn test_pattern_filters_rejected_below_2_36() {
        let opts = SearchOpts::new()
            .with("name~", "snap")
            .with("status", "available");
        let err = gate(30).check(&opts, PATTERN_FILTERS).unwrap_err();
        match err {
            ApiError::UnsupportedByVersion {
                params, required, ..
            } => {
                assert_eq!(params, vec!["name~".to_string()]);
                assert_eq!(required, ApiVersion::new(2, 36));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_all_offending_params_are_named() {
        let opts = SearchOpts::new()
            .with("name~", "a")
            .with("description~", "b")
            .with("description", "c");
        let err = gate(35).check(&opts, PATTERN_FILTERS).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name~"));
        assert!(message.contains("description~"));
        assert!(message.contains(", description "));
        assert!(message.contains(">= 2.36"));
    }

    #[test]
    fn test_pattern_filters_allowed_from_2_36() {
        let opts = SearchOpts::new().with("description", "nightly");
        assert!(gate(36).check(&opts, PATTERN_FILTERS).is_ok());
        assert!(gate(51).check(&opts, PATTERN_FILTERS).is_ok());
    }

    #[test]
    fn test_ungated_params_pass_at_any_version() {
        let opts = SearchOpts::new().with("status", "available");
        assert!(gate(0).check(&opts, PATTERN_FILTERS).is_ok());
    }

    #[test]
    fn test_prefixed_names() {
        assert_eq!(gate(6).prefixed("force_delete"), "os-force_delete");
        assert_eq!(gate(7).prefixed("force_delete"), "force_delete");
    }

    #[test]
    fn test_require_feature() {
        assert!(gate(31).require(Feature::SnapshotExportLocations).is_err());
        assert!(gate(32).require(Feature::SnapshotExportLocations).is_ok());
    }
}
