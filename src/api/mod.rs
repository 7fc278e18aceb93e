//! Share API interaction module
//!
//! This module provides the transport side of the client: authentication,
//! the HTTP wrapper, microversion handling and the session client.
//!
//! # Module Structure
//!
//! - [`auth`] - Token or Keystone v3 password authentication
//! - [`client`] - Session client carrying endpoint, token and negotiated version
//! - [`http`] - HTTP utilities for REST API calls
//! - [`version`] - Microversion parsing, ordering and negotiation
//!
//! # Example
//!
//! ```ignore
//! use manila_cli::api::{auth::Credentials, client::ShareClient, http::HttpOptions};
//!
//! async fn example(creds: Credentials) -> manila_cli::error::Result<()> {
//!     let client = ShareClient::connect(&creds, None, &HttpOptions::default()).await?;
//!     let snapshots = client.get("/snapshots").await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod version;
