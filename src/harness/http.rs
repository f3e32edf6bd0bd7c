//! HTTP utilities for Harness REST API calls

use super::error::ApiError;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Header carrying the static API key
pub const HEADER_API_KEY: &str = "x-api-key";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and drops control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = match body.char_indices().nth(MAX_LOG_BODY_LENGTH) {
        Some((idx, _)) => format!("{}... [truncated, {} bytes total]", &body[..idx], body.len()),
        None => body.to_string(),
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Keys whose values never reach the log
const REDACTED_KEYS: &[&str] = &["value", "password", "token"];

/// Copy of a request body with secret material masked
pub(crate) fn redact_for_log(body: &Value) -> Value {
    match body {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if REDACTED_KEYS.contains(&k.as_str()) && !v.is_null() {
                        Value::String("****".to_string())
                    } else {
                        redact_for_log(v)
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_for_log).collect()),
        other => other.clone(),
    }
}

/// HTTP client wrapper for Harness API calls
#[derive(Clone)]
pub struct HarnessHttpClient {
    client: Client,
}

impl HarnessHttpClient {
    /// Create a new HTTP client with a bounded request timeout
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("harness-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(ApiError::ClientInit)?;

        Ok(Self { client })
    }

    /// POST a JSON body
    pub async fn post_json(
        &self,
        url: &Url,
        api_key: &str,
        body: &Value,
    ) -> Result<Value, ApiError> {
        tracing::debug!("POST {}", url);

        // reqwest sets Content-Type: application/json for us
        let request = self
            .client
            .post(url.clone())
            .header(HEADER_API_KEY, api_key)
            .json(body);

        self.execute(request, url).await
    }

    /// POST a multipart form
    pub async fn post_form(&self, url: &Url, api_key: &str, form: Form) -> Result<Value, ApiError> {
        tracing::debug!("POST (multipart) {}", url);

        let request = self
            .client
            .post(url.clone())
            .header(HEADER_API_KEY, api_key)
            .multipart(form);

        self.execute(request, url).await
    }

    /// DELETE a resource
    pub async fn delete(&self, url: &Url, api_key: &str) -> Result<Value, ApiError> {
        tracing::debug!("DELETE {}", url);

        let request = self.client.delete(url.clone()).header(HEADER_API_KEY, api_key);

        self.execute(request, url).await
    }

    async fn execute(&self, request: RequestBuilder, url: &Url) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        read_document(response, url).await
    }
}

/// Decode a response body into a JSON document.
///
/// Error statuses are decoded the same way as successes; the API reports its
/// business result inside the document and callers interpret it from there.
async fn read_document(response: Response, url: &Url) -> Result<Value, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(|source| ApiError::Transport {
        url: url.to_string(),
        source,
    })?;

    if status.is_success() {
        tracing::trace!("{} - {}", status, sanitize_for_log(&body));
    } else {
        tracing::debug!("API returned {} - {}", status, sanitize_for_log(&body));
    }

    // Handle empty response
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_short_body_untouched() {
        assert_eq!(sanitize_for_log(r#"{"status":"SUCCESS"}"#), r#"{"status":"SUCCESS"}"#);
    }

    #[test]
    fn test_sanitize_truncates_on_char_boundary() {
        let body = "ü".repeat(300);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"ü".repeat(200)));
        assert!(sanitized.contains("[truncated, 600 bytes total]"));
    }

    #[test]
    fn test_redact_masks_secret_values() {
        let body = json!({
            "secret": {
                "name": "gh-pat",
                "spec": {"valueType": "Inline", "value": "s3cr3t"}
            }
        });
        let redacted = redact_for_log(&body);
        assert_eq!(redacted["secret"]["spec"]["value"], "****");
        assert_eq!(redacted["secret"]["spec"]["valueType"], "Inline");
        assert_eq!(redacted["secret"]["name"], "gh-pat");
        assert!(!redacted.to_string().contains("s3cr3t"));
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_for_log("a\nb\tc"), "abc");
    }
}
