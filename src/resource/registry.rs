//! Resource Registry - Load resource definitions from JSON
//!
//! Every resource kind the CLI manages is described once in an embedded JSON
//! table: where it is created, deleted or listed, which key wraps the request
//! body, and where the reply carries the identifier.

use crate::harness::ApiError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[include_str!("../resources/harness.json")];

fn default_deleted_path() -> String {
    "data".to_string()
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    /// Key wrapping the request payload, e.g. `{"project": {...}}`
    #[serde(default)]
    pub envelope: Option<String>,
    #[serde(default)]
    pub create_path: Option<String>,
    /// Multipart endpoint for file-backed variants
    #[serde(default)]
    pub upload_path: Option<String>,
    /// Path template with an `{id}` placeholder
    #[serde(default)]
    pub delete_path: Option<String>,
    #[serde(default)]
    pub list_path: Option<String>,
    /// Dot path of the identifier in a successful create reply
    #[serde(default)]
    pub identifier_path: Option<String>,
    /// Dot path of the boolean in a successful delete reply
    #[serde(default = "default_deleted_path")]
    pub deleted_path: String,
    #[serde(default)]
    pub list_response_path: Option<String>,
    /// Fixed query parameters sent with every call for this resource
    #[serde(default)]
    pub query: BTreeMap<String, String>,
}

impl ResourceDef {
    /// Read an optional field, failing when this resource does not support
    /// the operation that needs it
    pub fn require<'a>(
        &'a self,
        field: &'a Option<String>,
        what: &str,
    ) -> Result<&'a str, ApiError> {
        field.as_deref().ok_or_else(|| {
            ApiError::InvalidArgument(format!("{} does not support {}", self.display_name, what))
        })
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Resource kinds known to the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    Secret,
    Connector,
    DelegateGroups,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Project,
        ResourceKind::Secret,
        ResourceKind::Connector,
        ResourceKind::DelegateGroups,
    ];

    /// Registry key
    pub fn key(&self) -> &'static str {
        match self {
            ResourceKind::Project => "project",
            ResourceKind::Secret => "secret",
            ResourceKind::Connector => "connector",
            ResourceKind::DelegateGroups => "delegate-groups",
        }
    }

    /// Look up the definition of this kind
    pub fn def(&self) -> Result<&'static ResourceDef, ApiError> {
        get_resource(self.key())
            .ok_or_else(|| ApiError::InvalidArgument(format!("Unknown resource: {}", self.key())))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}
