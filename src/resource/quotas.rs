//! Quota sets

use super::fetcher::SearchOpts;
use super::manager::{Manager, Resource};
use super::registry::resource_def;
use crate::api::client::ShareClient;
use crate::error::{ApiError, Result};
use crate::version_gate::QUOTA_SCOPES;
use serde::Serialize;

/// Narrows a quota set to one user or one share type of a project
#[derive(Debug, Clone, Default)]
pub struct QuotaScope {
    pub user_id: Option<String>,
    pub share_type: Option<String>,
}

impl QuotaScope {
    fn to_opts(&self) -> Result<SearchOpts> {
        if self.user_id.is_some() && self.share_type.is_some() {
            return Err(ApiError::command(
                "'user' and 'share type' quota scopes cannot be combined",
            ));
        }
        let mut opts = SearchOpts::new();
        opts.insert_opt("user_id", self.user_id.as_deref());
        opts.insert_opt("share_type", self.share_type.as_deref());
        Ok(opts)
    }
}

/// New limits; unset fields are left unchanged on the server
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuotaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshots: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gigabytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_gigabytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_networks: Option<i64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
}

impl QuotaUpdate {
    pub fn is_empty(&self) -> bool {
        self.shares.is_none()
            && self.snapshots.is_none()
            && self.gigabytes.is_none()
            && self.snapshot_gigabytes.is_none()
            && self.share_networks.is_none()
    }
}

/// Manage per-project quotas
pub struct QuotaSetManager<'c> {
    base: Manager<'c>,
}

impl<'c> QuotaSetManager<'c> {
    pub fn new(client: &'c ShareClient) -> Self {
        Self {
            base: Manager::new(client, resource_def("quota_sets")),
        }
    }

    /// Validate the scope and render it as a query string
    fn scoped_query(&self, scope: &QuotaScope) -> Result<String> {
        let opts = scope.to_opts()?;
        self.base.gate().check(&opts, QUOTA_SCOPES)?;
        Ok(opts.to_query())
    }

    pub async fn get(&self, project_id: &str, scope: &QuotaScope) -> Result<Resource> {
        let path = format!("{}{}", self.base.item_path(project_id), self.scoped_query(scope)?);
        self.base.get_at(&path).await
    }

    /// Default quotas applied to new projects
    pub async fn defaults(&self, project_id: &str) -> Result<Resource> {
        let path = format!("{}/defaults", self.base.item_path(project_id));
        self.base.get_at(&path).await
    }

    pub async fn update(
        &self,
        project_id: &str,
        scope: &QuotaScope,
        update: &QuotaUpdate,
    ) -> Result<Resource> {
        if update.is_empty() {
            return Err(ApiError::command("Nothing to update, no quota limits given"));
        }
        let query = self.scoped_query(scope)?;

        let fields = serde_json::to_value(update)
            .map_err(|e| ApiError::command(format!("Invalid quota update: {}", e)))?;

        let path = format!("{}{}", self.base.item_path(project_id), query);
        tracing::debug!("Updating quotas for project {}", project_id);

        let body = serde_json::json!({ "quota_set": fields });
        let response = self.base.client().put(&path, &body).await?;
        let inner = response.get("quota_set").cloned().ok_or_else(|| {
            ApiError::MalformedResponse("missing 'quota_set' in response".into())
        })?;
        Resource::from_value(self.base.def(), inner)
    }

    /// Revert quotas to their defaults
    pub async fn delete(&self, project_id: &str, scope: &QuotaScope) -> Result<()> {
        let path = format!("{}{}", self.base.item_path(project_id), self.scoped_query(scope)?);
        self.base.client().delete(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_serializes_only_given_limits() {
        let update = QuotaUpdate {
            shares: Some(20),
            gigabytes: Some(500),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"shares": 20, "gigabytes": 500})
        );
    }

    #[test]
    fn test_force_is_sent_only_when_set() {
        let update = QuotaUpdate {
            snapshots: Some(5),
            force: true,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"snapshots": 5, "force": true})
        );
    }

    #[test]
    fn test_scope_conflict() {
        let scope = QuotaScope {
            user_id: Some("u1".into()),
            share_type: Some("gold".into()),
        };
        assert!(scope.to_opts().is_err());
    }

    #[test]
    fn test_scope_query() {
        let scope = QuotaScope {
            user_id: Some("u1".into()),
            share_type: None,
        };
        assert_eq!(scope.to_opts().unwrap().to_query(), "?user_id=u1");
    }
}
