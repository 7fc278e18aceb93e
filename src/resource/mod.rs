//! Resource abstraction layer
//!
//! One manager per share API resource type. Managers translate typed calls
//! into REST requests and wrap the answers in [`Resource`] handles.
//!
//! # Architecture
//!
//! - [`registry`] - Loads resource definitions (paths, body keys, alias tables,
//!   list columns) from embedded JSON
//! - [`fetcher`] - Search options and paginated list fetching
//! - [`manager`] - Resource handles, shared request plumbing and
//!   name-or-ID resolution
//! - one module per resource type
//!
//! # Example
//!
//! ```ignore
//! use manila_cli::resource::{find_resource, ShareSnapshotManager};
//!
//! async fn delete(client: &ShareClient, name: &str) -> manila_cli::error::Result<()> {
//!     let manager = ShareSnapshotManager::new(client);
//!     let snapshot = find_resource(&manager, name).await?;
//!     manager.delete(&snapshot).await
//! }
//! ```

pub mod fetcher;
pub mod manager;
pub mod pools;
pub mod quotas;
mod registry;
pub mod services;
pub mod share_servers;
pub mod share_types;
pub mod shares;
pub mod snapshots;

pub use fetcher::{extract_json_value, SearchOpts};
pub use manager::{find_resource, Findable, Resource};
pub use pools::PoolManager;
pub use quotas::{QuotaScope, QuotaSetManager, QuotaUpdate};
pub use registry::{get_all_resource_keys, get_resource, ResourceDef};
pub use services::ServiceManager;
pub use share_servers::ShareServerManager;
pub use share_types::ShareTypeManager;
pub use shares::ShareManager;
pub use snapshots::{ShareSnapshotManager, SnapshotStatus, SnapshotUpdate};

/// Older name of the pool listing manager
#[deprecated(note = "use `PoolManager`")]
pub type SchedulerStatsManager<'c> = PoolManager<'c>;
