//! Resource scopes
//!
//! Harness resources live at account, organization or project level. The
//! scope decides which identifiers accompany a request.

use clap::ValueEnum;
use std::fmt;

pub const QUERY_ORG_ID: &str = "orgIdentifier";
pub const QUERY_PROJECT_ID: &str = "projectIdentifier";

/// Level at which a resource is created or looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scope {
    Account,
    Org,
    #[default]
    Project,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Account => "account",
            Scope::Org => "org",
            Scope::Project => "project",
        }
    }

    /// Prefix a secret reference so it resolves from this scope.
    ///
    /// Project level references are used as-is.
    pub fn secret_ref(&self, secret_id: &str) -> String {
        match self {
            Scope::Account => format!("account.{}", secret_id),
            Scope::Org => format!("org.{}", secret_id),
            Scope::Project => secret_id.to_string(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters identifying the scope of a request.
///
/// Project and org scopes always send their identifiers, even when empty, and
/// leave validation to the API. Account scope is permissive and only forwards
/// identifiers that were actually supplied.
pub fn apply_scope(scope: Scope, org_id: &str, project_id: &str) -> Vec<(&'static str, String)> {
    match scope {
        Scope::Project => vec![
            (QUERY_ORG_ID, org_id.to_string()),
            (QUERY_PROJECT_ID, project_id.to_string()),
        ],
        Scope::Org => vec![(QUERY_ORG_ID, org_id.to_string())],
        Scope::Account => {
            let mut params = Vec::new();
            if !org_id.is_empty() {
                params.push((QUERY_ORG_ID, org_id.to_string()));
            }
            if !project_id.is_empty() {
                params.push((QUERY_PROJECT_ID, project_id.to_string()));
            }
            params
        }
    }
}

/// Scope together with the identifiers it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedIds {
    pub scope: Scope,
    pub org_id: String,
    pub project_id: String,
}

impl ScopedIds {
    /// Keep only the identifiers the scope owns.
    ///
    /// An org id given at account scope, or a project id given at org scope,
    /// is dropped so it never reaches the request.
    pub fn new(scope: Scope, org_id: &str, project_id: Option<&str>) -> Self {
        let project_id = project_id.unwrap_or_default();
        let (org_id, project_id) = match scope {
            Scope::Project => (org_id.to_string(), project_id.to_string()),
            Scope::Org => (org_id.to_string(), String::new()),
            Scope::Account => (String::new(), String::new()),
        };
        Self {
            scope,
            org_id,
            project_id,
        }
    }

    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        apply_scope(self.scope, &self.org_id, &self.project_id)
    }

    pub fn org(&self) -> Option<&str> {
        Some(self.org_id.as_str()).filter(|s| !s.is_empty())
    }

    pub fn project(&self) -> Option<&str> {
        Some(self.project_id.as_str()).filter(|s| !s.is_empty())
    }
}
