//! Share services (scheduler, share, data ...)

use super::fetcher::SearchOpts;
use super::manager::{Manager, Resource};
use super::registry::resource_def;
use crate::api::client::ShareClient;
use crate::error::Result;

pub struct ServiceManager<'c> {
    base: Manager<'c>,
}

impl<'c> ServiceManager<'c> {
    pub fn new(client: &'c ShareClient) -> Self {
        Self {
            base: Manager::new(client, resource_def("services")),
        }
    }

    /// Filters: `host`, `binary`, `zone`, `state`, `status`
    pub async fn list(&self, opts: &SearchOpts) -> Result<Vec<Resource>> {
        self.base.list(opts, false).await
    }
}
