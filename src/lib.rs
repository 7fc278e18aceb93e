//! Client library and command implementations for the shared file systems
//! (share) REST API.
//!
//! - [`api`] - transport, Keystone authentication and microversion negotiation
//! - [`resource`] - one manager per resource type plus name-or-ID resolution
//! - [`version_gate`] - which parameters and features each microversion allows
//! - [`batch`] - multi-target commands that report partial failure
//! - [`commands`] - the `manila` CLI commands
//! - [`output`] - tables, details and their rendering

pub mod api;
pub mod batch;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod resource;
pub mod version_gate;

/// Version injected at compile time via MANILA_CLI_VERSION (set by CI/CD),
/// or the crate version for local builds.
pub const VERSION: &str = match option_env!("MANILA_CLI_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
