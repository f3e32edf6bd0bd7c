//! Harness API interaction module
//!
//! This module provides the request-construction layer for the Harness
//! NextGen management API.
//!
//! # Module Structure
//!
//! - [`identifier`] - Display name to API identifier derivation
//! - [`scope`] - Account / org / project scope resolution
//! - [`client`] - Main client and per-request builder
//! - [`http`] - HTTP transport and document decoding
//! - [`response`] - Typed interpretation of response documents
//! - [`error`] - Error type shared by the layer
//!
//! # Example
//!
//! ```ignore
//! use harness_cli::harness::{HarnessClient, ScopedIds, Scope};
//!
//! async fn example(client: &HarnessClient) -> Result<(), harness_cli::harness::ApiError> {
//!     let ids = ScopedIds::new(Scope::Org, "default", None);
//!     let doc = client
//!         .request()
//!         .scoped(&ids)
//!         .delete_by_id("ng/api/connectors/{id}", "dockerhub")
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod identifier;
pub mod response;
pub mod scope;

pub use client::{FileUpload, HarnessClient, RequestHandle};
pub use error::ApiError;
pub use identifier::{derive_identifier, parse_tags};
pub use response::{Expect, Outcome};
pub use scope::{apply_scope, Scope, ScopedIds};
