//! Resource abstraction layer
//!
//! This module provides a data-driven approach to managing Harness resources.
//! Resource definitions are loaded from a JSON file at compile time, so the
//! create / delete / list sequence is written once for every kind.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`model`] - Request payloads per resource kind
//! - [`operations`] - Generic create, upload, delete and list calls
//!
//! # Example
//!
//! ```ignore
//! use harness_cli::harness::{HarnessClient, Scope, ScopedIds};
//! use harness_cli::resource::{operations, ProjectSpec, ResourceKind, ResourceRequest};
//!
//! async fn new_project(client: &HarnessClient) -> anyhow::Result<()> {
//!     let ids = ScopedIds::new(Scope::Org, &client.org_id, None);
//!     let spec = ProjectSpec { modules: vec![] };
//!     let request = ResourceRequest::new("Demo", &client.account_id, &ids, spec)?;
//!     let kind = ResourceKind::Project;
//!     let outcome = operations::create(client, kind, &ids, "Demo", &request).await?;
//!     operations::report(&outcome, kind, "Demo", &mut std::io::stdout())?;
//!     Ok(())
//! }
//! ```

pub mod model;
pub mod operations;
pub mod registry;

pub use model::*;
pub use registry::*;
