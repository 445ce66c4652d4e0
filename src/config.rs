//! Client configuration.
//!
//! Configuration is passed explicitly at construction; there is no
//! process-global state. Defaults target a local development topology
//! (node and scoring service on localhost).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings shared by the ledger and scoring clients.
///
/// Private keys never live here: signing material is supplied through
/// [`crate::wallet::Wallet`] so that a serialized config stays safe to
/// log or commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Ledger node JSON-RPC endpoint.
    pub node_url: String,

    /// Scoring service base URL.
    pub scoring_url: String,

    /// Per-request timeout in seconds, applied to RPC and REST calls alike.
    pub request_timeout_secs: u64,

    /// Delay between confirmation polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Default deadline for confirmation polling in seconds.
    pub confirmation_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            node_url: "http://localhost:8545".to_string(),
            scoring_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 10,
            poll_interval_ms: 1_000,
            confirmation_timeout_secs: 60,
        }
    }
}

impl ClientConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        let config: ClientConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic validation beyond what deserialization enforces.
    pub fn validate(&self) -> Result<()> {
        self.node_url
            .parse::<url::Url>()
            .map_err(|e| Error::Config(format!("Invalid node URL '{}': {}", self.node_url, e)))?;
        self.scoring_url.parse::<url::Url>().map_err(|e| {
            Error::Config(format!(
                "Invalid scoring URL '{}': {}",
                self.scoring_url, e
            ))
        })?;
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert_eq!(config.node_url, "http://localhost:8545");
        assert_eq!(config.scoring_url, "http://localhost:8000");
        assert_eq!(config.poll_interval_ms, 1_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ClientConfig =
            toml::from_str("node_url = \"http://node.example:9000\"").unwrap();
        assert_eq!(config.node_url, "http://node.example:9000");
        assert_eq!(config.scoring_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = ClientConfig {
            node_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid node URL"));
    }

    #[test]
    fn test_validate_rejects_zero_intervals() {
        let config = ClientConfig {
            poll_interval_ms: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            request_timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_round_trip() {
        let path = std::env::temp_dir().join("ledger-sdk-config-test.toml");
        std::fs::write(
            &path,
            "node_url = \"http://127.0.0.1:8545\"\npoll_interval_ms = 250\n",
        )
        .unwrap();
        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.poll_interval_ms, 250);
        std::fs::remove_file(&path).ok();
    }
}
