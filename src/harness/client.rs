//! Harness Client
//!
//! Main client for the Harness NextGen API, combining the static API key,
//! the account identifier and the HTTP transport.

use super::error::ApiError;
use super::http::{redact_for_log, sanitize_for_log, HarnessHttpClient};
use super::scope::ScopedIds;
use crate::config::Settings;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use url::Url;

/// Query parameter carrying the account identifier on every request
pub const QUERY_ACCOUNT_ID: &str = "accountIdentifier";

/// Placeholder substituted by [`RequestHandle::delete_by_id`]
pub const ID_PLACEHOLDER: &str = "{id}";

/// Main Harness client
#[derive(Clone)]
pub struct HarnessClient {
    pub http: HarnessHttpClient,
    pub account_id: String,
    pub org_id: String,
    api_key: String,
    base_url: Url,
}

impl HarnessClient {
    /// Create a new client from resolved settings
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        if settings.api_key.is_empty() {
            return Err(ApiError::InvalidArgument("API key must not be empty".to_string()));
        }

        let mut base_url = Url::parse(&settings.endpoint)?;
        // Url::join drops the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: HarnessHttpClient::new(settings.timeout)?,
            account_id: settings.account_id.clone(),
            org_id: settings.org_id.clone(),
            api_key: settings.api_key.clone(),
            base_url,
        })
    }

    /// Start a request carrying the API key and account identifier
    pub fn request(&self) -> RequestHandle<'_> {
        RequestHandle {
            client: self,
            query: vec![(QUERY_ACCOUNT_ID, self.account_id.clone())],
        }
    }

    /// Build an API URL from a path relative to the endpoint
    pub fn api_url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

/// A file attached to a multipart request
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl FileUpload {
    /// Load the whole file into memory
    pub async fn read(path: &Path) -> Result<Self, ApiError> {
        let content = tokio::fs::read(path).await.map_err(|source| ApiError::FileRead {
            path: path.display().to_string(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        Ok(Self { file_name, content })
    }
}

/// A single authenticated request being assembled
pub struct RequestHandle<'a> {
    client: &'a HarnessClient,
    query: Vec<(&'static str, String)>,
}

impl RequestHandle<'_> {
    /// Attach the identifiers of a scope
    pub fn scoped(mut self, ids: &ScopedIds) -> Self {
        self.query.extend(ids.query_params());
        self
    }

    /// Attach an extra query parameter
    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let mut url = self.client.api_url(path)?;
        url.query_pairs_mut()
            .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    /// Serialize `body` as JSON and POST it
    pub async fn post_json<B: Serialize + ?Sized>(
        self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;
        tracing::trace!("BODY {}", sanitize_for_log(&redact_for_log(&body).to_string()));
        self.client.http.post_json(&url, &self.client.api_key, &body).await
    }

    /// POST `spec` as a form field next to the file content
    pub async fn post_multipart<B: Serialize + ?Sized>(
        self,
        path: &str,
        spec: &B,
        file: FileUpload,
    ) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        let spec = serde_json::to_string(spec).map_err(ApiError::Encode)?;
        let form = Form::new()
            .text("spec", spec)
            .part("file", Part::bytes(file.content).file_name(file.file_name));
        self.client.http.post_form(&url, &self.client.api_key, form).await
    }

    /// Substitute `id` into the `{id}` placeholder and DELETE
    pub async fn delete_by_id(self, path_template: &str, id: &str) -> Result<Value, ApiError> {
        let path = path_template.replace(ID_PLACEHOLDER, &urlencoding::encode(id));
        let url = self.url(&path)?;
        self.client.http.delete(&url, &self.client.api_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::scope::Scope;
    use std::time::Duration;

    fn settings(endpoint: &str) -> Settings {
        Settings {
            api_key: "pat.123".to_string(),
            account_id: "acct".to_string(),
            org_id: "default".to_string(),
            endpoint: endpoint.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_api_url_keeps_gateway_prefix() {
        let client = HarnessClient::new(&settings("https://app.harness.io/gateway")).unwrap();
        let url = client.api_url("/ng/api/projects").unwrap();
        assert_eq!(url.as_str(), "https://app.harness.io/gateway/ng/api/projects");
    }

    #[test]
    fn test_request_url_carries_account_and_scope() {
        let client = HarnessClient::new(&settings("https://app.harness.io/gateway/")).unwrap();
        let ids = ScopedIds::new(Scope::Project, "default", Some("demo"));
        let url = client.request().scoped(&ids).url("ng/api/connectors").unwrap();
        assert_eq!(
            url.query(),
            Some("accountIdentifier=acct&orgIdentifier=default&projectIdentifier=demo")
        );
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut s = settings("https://app.harness.io/gateway");
        s.api_key.clear();
        assert!(matches!(
            HarnessClient::new(&s),
            Err(ApiError::InvalidArgument(_))
        ));
    }
}
