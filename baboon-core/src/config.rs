use crate::contracts::ContractAddresses;
use crate::error::{BaboonError, Result};
use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_GAMES_ADDRESS: Address = address!("c2489F21cfCCe0db9542F0A5A110F6D7c4514Cc5");
pub const DEFAULT_TOKEN_ADDRESS: Address = address!("6B276a376EE1b93205fB8bcaC387B86a7DFb380d");
pub const DEFAULT_ADMIN_ADDRESS: Address = address!("174501fd8461F910beDE1E2689Aee51c4B55a85a");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaboonConfig {
    /// Provider endpoint used for reads and receipts.
    pub rpc_url: String,
    /// Wallet endpoint that owns the keys and signs transactions.
    pub wallet_url: String,
    pub contracts: ContractAddresses,
    pub admins: Vec<Address>,
    pub receipt_poll_interval_ms: u64,
    pub receipt_timeout_secs: u64,
}

impl Default for BaboonConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            wallet_url: "http://localhost:1248".to_string(),
            contracts: ContractAddresses {
                games: DEFAULT_GAMES_ADDRESS,
                token: DEFAULT_TOKEN_ADDRESS,
            },
            admins: vec![DEFAULT_ADMIN_ADDRESS],
            receipt_poll_interval_ms: 2_000,
            receipt_timeout_secs: 300,
        }
    }
}

impl BaboonConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() {
            return Err(BaboonError::config("RPC URL cannot be empty"));
        }

        if self.wallet_url.is_empty() {
            return Err(BaboonError::config("Wallet URL cannot be empty"));
        }

        if self.contracts.games.is_zero() || self.contracts.token.is_zero() {
            return Err(BaboonError::config("Contract addresses cannot be zero"));
        }

        if self.contracts.games == self.contracts.token {
            return Err(BaboonError::config(
                "Games and token contracts must be different addresses",
            ));
        }

        if self.receipt_poll_interval_ms == 0 {
            return Err(BaboonError::config(
                "Receipt poll interval must be greater than 0",
            ));
        }

        if self.receipt_timeout() <= self.receipt_poll_interval() {
            return Err(BaboonError::config(
                "Receipt timeout must be longer than the poll interval",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = BaboonConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.admins, vec![DEFAULT_ADMIN_ADDRESS]);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "rpc_url": "https://rpc.example.org", "receipt_timeout_secs": 60 }"#,
        )
        .unwrap();

        let config = BaboonConfig::from_file(&path).unwrap();
        assert_eq!(config.rpc_url, "https://rpc.example.org");
        assert_eq!(config.receipt_timeout(), Duration::from_secs(60));
        assert_eq!(config.contracts.games, DEFAULT_GAMES_ADDRESS);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = BaboonConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.wallet_url, BaboonConfig::default().wallet_url);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = BaboonConfig::default();
        config.contracts.token = config.contracts.games;
        assert!(matches!(config.validate(), Err(BaboonError::Config(_))));

        let mut config = BaboonConfig::default();
        config.receipt_poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
