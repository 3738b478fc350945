//! CLI configuration management

use radius_sdk::ClientOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::CliError;

/// CLI configuration, stored at `~/.radius/config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Seconds to wait for a receipt after broadcast
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
    /// Milliseconds between receipt polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Clef endpoint used when signing with `--from`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clef_url: Option<String>,
}

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_receipt_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    250
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            receipt_timeout_secs: default_receipt_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            clef_url: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".radius"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from file or return default
    pub fn load() -> Self {
        let loaded = Self::config_path()
            .filter(|path| path.exists())
            .and_then(|path| std::fs::read_to_string(path).ok())
            .map(|content| toml::from_str::<Config>(&content));

        match loaded {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "ignoring unreadable config file");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = Self::config_path()
            .ok_or_else(|| CliError::Config("cannot determine home directory".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// SDK options derived from this config
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::default()
            .with_receipt_timeout(Duration::from_secs(self.receipt_timeout_secs))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.receipt_timeout_secs, 30);
        assert_eq!(config.poll_interval_ms, 250);
        assert!(config.clef_url.is_none());
    }

    #[test]
    fn test_config_serialize_skips_missing_clef() {
        let toml = toml::to_string(&Config::default()).unwrap();
        assert!(toml.contains("rpc_url"));
        assert!(!toml.contains("clef_url"));
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let config: Config = toml::from_str(r#"rpc_url = "https://rpc.example.com""#).unwrap();
        assert_eq!(config.rpc_url, "https://rpc.example.com");
        assert_eq!(config.receipt_timeout_secs, 30);
    }

    #[test]
    fn test_client_options() {
        let config = Config {
            receipt_timeout_secs: 5,
            poll_interval_ms: 20,
            ..Default::default()
        };
        let options = config.client_options();
        assert_eq!(options.receipt_timeout, Duration::from_secs(5));
        assert_eq!(options.poll_interval, Duration::from_millis(20));
    }
}
