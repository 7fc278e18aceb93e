//! Scheduler storage pools

use super::fetcher::SearchOpts;
use super::manager::{Manager, Resource};
use super::registry::resource_def;
use crate::api::client::ShareClient;
use crate::error::Result;
use crate::version_gate::POOL_FILTERS;

/// List back end storage pools known to the scheduler
pub struct PoolManager<'c> {
    base: Manager<'c>,
}

impl<'c> PoolManager<'c> {
    pub fn new(client: &'c ShareClient) -> Self {
        Self {
            base: Manager::new(client, resource_def("pools")),
        }
    }

    /// Filters: `host`, `backend`, `pool`, and `share_type` from 2.23
    pub async fn list(&self, opts: &SearchOpts, detailed: bool) -> Result<Vec<Resource>> {
        self.base.gate().check(opts, POOL_FILTERS)?;
        self.base.list(opts, detailed).await
    }
}
