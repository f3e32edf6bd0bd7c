//! `config` commands

use crate::config::{mask_secret, Config, Overrides};
use anyhow::{bail, Context, Result};
use clap::{Subcommand, ValueEnum};
use serde_json::json;
use std::io::Write;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings
    Show,

    /// Persist a default value
    #[command(after_help = "Examples:\n  harness-cli config set account-id <account id>\n  harness-cli config set timeout 60")]
    Set {
        #[arg(value_enum)]
        key: ConfigKey,
        value: String,
    },

    /// Print the location of the configuration file
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    AccountId,
    OrgId,
    Endpoint,
    Timeout,
}

impl ConfigKey {
    /// Store `value` under this key; an empty value clears it
    pub fn apply(&self, config: &mut Config, value: &str) -> Result<()> {
        let value = Some(value.trim()).filter(|v| !v.is_empty());
        match self {
            ConfigKey::AccountId => config.account_id = value.map(str::to_string),
            ConfigKey::OrgId => config.org_id = value.map(str::to_string),
            ConfigKey::Endpoint => {
                if let Some(v) = value {
                    url::Url::parse(v).with_context(|| format!("Invalid endpoint URL '{}'", v))?;
                }
                config.endpoint = value.map(str::to_string);
            }
            ConfigKey::Timeout => {
                config.timeout_secs = value
                    .map(|v| match v.parse::<u64>() {
                        Ok(0) => bail!("Timeout must be at least one second"),
                        parsed => parsed.with_context(|| format!("Invalid timeout '{}'", v)),
                    })
                    .transpose()?;
            }
        }
        Ok(())
    }
}

pub fn run<W: Write>(
    cmd: ConfigCommand,
    path: &Path,
    overrides: &Overrides,
    out: &mut W,
) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let config = Config::load_from(path);
            let effective = json!({
                "account_id": overrides.account_id.as_ref().or(config.account_id.as_ref()),
                "org_id": config.effective_org(overrides),
                "endpoint": config.effective_endpoint(overrides),
                "timeout_secs": config.effective_timeout(overrides).as_secs(),
                "api_key": overrides.api_key.as_deref().map(mask_secret),
                "config_file": path.display().to_string(),
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&effective)?)?;
        }
        ConfigCommand::Set { key, value } => {
            let mut config = Config::load_from(path);
            key.apply(&mut config, &value)?;
            config.save_to(path)?;
            tracing::info!("Saved {:?} to {:?}", key, path);
        }
        ConfigCommand::Path => writeln!(out, "{}", path.display())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_show() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut sink = Vec::new();

        let set = ConfigCommand::Set {
            key: ConfigKey::AccountId,
            value: "acct".to_string(),
        };
        run(set, &path, &Overrides::default(), &mut sink).unwrap();
        assert_eq!(Config::load_from(&path).account_id.as_deref(), Some("acct"));

        let overrides = Overrides {
            api_key: Some("pat.secret".to_string()),
            org_id: Some("eng".to_string()),
            ..Default::default()
        };
        let mut out = Vec::new();
        run(ConfigCommand::Show, &path, &overrides, &mut out).unwrap();
        let shown: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(shown["account_id"], "acct");
        assert_eq!(shown["org_id"], "eng");
        assert_eq!(shown["api_key"], "pat.****");
        assert_eq!(shown["timeout_secs"], 30);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        assert!(ConfigKey::Timeout.apply(&mut config, "soon").is_err());
        assert!(ConfigKey::Timeout.apply(&mut config, "0").is_err());
        assert!(ConfigKey::Endpoint.apply(&mut config, "not a url").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_timeout_stored_in_seconds() {
        let mut config = Config::default();
        ConfigKey::Timeout.apply(&mut config, " 45 ").unwrap();
        assert_eq!(config.timeout_secs, Some(45));
    }

    #[test]
    fn test_empty_value_clears_key() {
        let mut config = Config {
            org_id: Some("eng".to_string()),
            ..Default::default()
        };
        ConfigKey::OrgId.apply(&mut config, "").unwrap();
        assert_eq!(config.org_id, None);
    }
}
