//! Request payloads
//!
//! Every resource shares the same envelope fields; the resource specific part
//! is flattened into it.

use crate::harness::{derive_identifier, ApiError, ScopedIds};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;

/// Common envelope of a create request
#[derive(Debug, Clone, Serialize)]
pub struct ResourceRequest<S> {
    pub name: String,
    pub identifier: String,
    #[serde(rename = "accountIdentifier")]
    pub account_id: String,
    #[serde(rename = "orgIdentifier", skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(rename = "projectIdentifier", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(flatten)]
    pub spec: S,
}

impl<S> ResourceRequest<S> {
    /// Build an envelope, deriving the identifier from `name`
    pub fn new(name: &str, account_id: &str, ids: &ScopedIds, spec: S) -> Result<Self, ApiError> {
        Ok(Self {
            name: name.to_string(),
            identifier: derive_identifier(name)?,
            account_id: account_id.to_string(),
            org_id: ids.org().map(str::to_string),
            project_id: ids.project().map(str::to_string),
            description: None,
            tags: BTreeMap::new(),
            spec,
        })
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.is_empty());
        self
    }

    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = tags;
        self
    }
}

// =============================================================================
// Projects
// =============================================================================

/// Harness modules a project can enable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
#[value(rename_all = "UPPER")]
pub enum Module {
    Cd,
    Ci,
    Cv,
    Cf,
    Ce,
    Sto,
    Core,
    Pms,
    Templateservice,
    Governance,
    Chaos,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSpec {
    pub modules: Vec<Module>,
}

// =============================================================================
// Secrets
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum SecretType {
    #[value(name = "SecretText")]
    SecretText,
    #[value(name = "SecretFile")]
    SecretFile,
    #[serde(rename = "SSHKey")]
    #[value(name = "SSHKey")]
    SshKey,
    #[value(name = "WinRmCredentials")]
    WinRmCredentials,
}

impl SecretType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretType::SecretText => "SecretText",
            SecretType::SecretFile => "SecretFile",
            SecretType::SshKey => "SSHKey",
            SecretType::WinRmCredentials => "WinRmCredentials",
        }
    }

    /// Everything but text secrets carries file content and is uploaded as
    /// a multipart form
    pub fn is_file_backed(&self) -> bool {
        !matches!(self, SecretType::SecretText)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum ValueType {
    #[value(name = "Inline")]
    Inline,
    #[value(name = "Reference")]
    Reference,
    #[value(name = "CustomSecretManagerValues")]
    CustomSecretManagerValues,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretValueSpec {
    pub secret_manager_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// `<SecretType>Spec`
    #[serde(rename = "type")]
    pub spec_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretSpec {
    #[serde(rename = "type")]
    pub secret_type: SecretType,
    pub private_secret: bool,
    pub spec: SecretValueSpec,
}

impl SecretSpec {
    /// Text secrets carry their value inline; file-backed ones send it as
    /// the multipart file part instead.
    pub fn new(
        secret_type: SecretType,
        secret_manager: &str,
        value_type: ValueType,
        text: Option<String>,
    ) -> Self {
        let (value_type, value) = match secret_type {
            SecretType::SecretText => (Some(value_type), text),
            _ => (None, None),
        };

        Self {
            secret_type,
            private_secret: false,
            spec: SecretValueSpec {
                secret_manager_identifier: secret_manager.to_string(),
                value_type,
                value,
                spec_type: format!("{}Spec", secret_type.as_str()),
            },
        }
    }
}

// =============================================================================
// Connectors
// =============================================================================

/// Connector payload: `type` plus a type specific `spec`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "spec")]
pub enum ConnectorSpec {
    DockerRegistry(DockerRegistrySpec),
    Github(GithubSpec),
    Gcp(GcpSpec),
}

impl ConnectorSpec {
    pub fn type_name(&self) -> &'static str {
        match self {
            ConnectorSpec::DockerRegistry(_) => "DockerRegistry",
            ConnectorSpec::Github(_) => "Github",
            ConnectorSpec::Gcp(_) => "Gcp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum DockerProvider {
    #[value(name = "DockerHub")]
    DockerHub,
    #[value(name = "Harbor")]
    Harbor,
    #[value(name = "Quay")]
    Quay,
    #[value(name = "Other")]
    Other,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernamePassword {
    pub username: String,
    pub password_ref: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "spec")]
pub enum DockerAuth {
    UsernamePassword(UsernamePassword),
    Anonymous,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerRegistrySpec {
    pub docker_registry_url: String,
    pub provider_type: DockerProvider,
    pub auth: DockerAuth,
    pub execute_on_delegate: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delegate_selectors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum GithubUrlType {
    #[value(name = "Account")]
    Account,
    #[value(name = "Repo")]
    Repo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameToken {
    pub username: String,
    pub token_ref: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "spec")]
pub enum GithubHttpCredentials {
    UsernameToken(UsernameToken),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SshCredentials {
    pub ssh_key_ref: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "spec")]
pub enum GithubAuth {
    Http(GithubHttpCredentials),
    Ssh(SshCredentials),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRef {
    pub token_ref: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "spec")]
pub enum GithubApiAccess {
    Token(TokenRef),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubSpec {
    pub url: String,
    #[serde(rename = "type")]
    pub url_type: GithubUrlType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_repo: Option<String>,
    pub authentication: GithubAuth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_access: Option<GithubApiAccess>,
    pub execute_on_delegate: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delegate_selectors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeyRef {
    pub secret_key_ref: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "spec")]
pub enum GcpCredential {
    ManualConfig(SecretKeyRef),
    InheritFromDelegate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpSpec {
    pub credential: GcpCredential,
    pub execute_on_delegate: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delegate_selectors: Vec<String>,
}

// =============================================================================
// Delegates
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DelegateTagQuery {
    pub tags: Vec<String>,
}
