//! Configuration Management
//!
//! Persistent defaults live in a small JSON file; flags and `HARNESS_*`
//! environment variables override them. The result is an explicit
//! [`Settings`] value handed to the client, never process-wide state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Gateway of the hosted Harness platform
pub const DEFAULT_ENDPOINT: &str = "https://app.harness.io/gateway";

/// Organization used when none is configured
pub const DEFAULT_ORG_ID: &str = "default";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Default account identifier
    #[serde(default)]
    pub account_id: Option<String>,
    /// Default organization identifier
    #[serde(default)]
    pub org_id: Option<String>,
    /// API gateway URL
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub account_id: Option<String>,
    pub org_id: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub account_id: String,
    pub org_id: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("harness-cli").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Could not read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective org (flag/env > config > "default")
    pub fn effective_org(&self, overrides: &Overrides) -> String {
        overrides
            .org_id
            .clone()
            .or_else(|| self.org_id.clone())
            .unwrap_or_else(|| DEFAULT_ORG_ID.to_string())
    }

    /// Get effective endpoint (flag/env > config > hosted gateway)
    pub fn effective_endpoint(&self, overrides: &Overrides) -> String {
        overrides
            .endpoint
            .clone()
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    /// Get effective timeout (flag/env > config > 30s)
    pub fn effective_timeout(&self, overrides: &Overrides) -> Duration {
        let secs = overrides
            .timeout_secs
            .or(self.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Combine the file defaults with command line values.
    ///
    /// The API key and account id are mandatory for every API call.
    pub fn resolve(&self, overrides: &Overrides) -> Result<Settings> {
        let api_key = overrides
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("No API key configured. Set HARNESS_API_KEY or use --api-key")
            })?;

        let account_id = overrides
            .account_id
            .clone()
            .or_else(|| self.account_id.clone())
            .filter(|a| !a.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No account id configured. Set HARNESS_ACCOUNT_ID, use --account-id \
                     or run 'config set account-id <id>'"
                )
            })?;

        let timeout = self.effective_timeout(overrides);
        if timeout.is_zero() {
            anyhow::bail!("Request timeout must be at least one second");
        }

        Ok(Settings {
            api_key,
            account_id,
            org_id: self.effective_org(overrides),
            endpoint: self.effective_endpoint(overrides),
            timeout,
        })
    }
}

/// Mask an API key for display, keeping a short prefix
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides() -> Overrides {
        Overrides {
            api_key: Some("pat.abc".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_flags_win_over_file() {
        let config = Config {
            account_id: Some("file-acct".to_string()),
            org_id: Some("file-org".to_string()),
            ..Default::default()
        };
        let mut o = overrides();
        o.account_id = Some("flag-acct".to_string());

        let settings = config.resolve(&o).unwrap();
        assert_eq!(settings.account_id, "flag-acct");
        assert_eq!(settings.org_id, "file-org");
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_org_defaults_to_default() {
        let config = Config {
            account_id: Some("acct".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve(&overrides()).unwrap().org_id, "default");
    }

    #[test]
    fn test_missing_api_key_is_error() {
        let config = Config {
            account_id: Some("acct".to_string()),
            ..Default::default()
        };
        assert!(config.resolve(&Overrides::default()).is_err());
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let config = Config {
            account_id: Some("acct".to_string()),
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.resolve(&overrides()).is_err());

        let mut o = overrides();
        o.timeout_secs = Some(10);
        assert_eq!(config.resolve(&o).unwrap().timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_missing_account_is_error() {
        assert!(Config::default().resolve(&overrides()).is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            account_id: Some("acct".to_string()),
            timeout_secs: Some(5),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_malformed_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("pat.abcdef"), "pat.****");
        assert_eq!(mask_secret("abc"), "****");
    }
}
