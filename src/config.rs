//! Configuration for the ccnft tool
//!
//! Loaded from a JSON file:
//!
//! ```json
//! {
//!   "log": { "level": "info" },
//!   "rpc": "https://mainnet.example/rpc",
//!   "contract": "0x...",
//!   "mnemonic": "/secrets/mnemonic.txt",
//!   "account": 0,
//!   "confirmation": { "pollIntervalMs": 1000, "maxWaitSecs": 600 }
//! }
//! ```

use crate::constants::{DEFAULT_DROP_AFTER_MISSES, DEFAULT_POLL_INTERVAL};
use crate::error::{Error, Result};
use alloy::primitives::Address;
use alloy::transports::http::reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
    /// RPC endpoint URL
    pub rpc: String,
    /// Contract address (hex)
    pub contract: String,
    /// Path to a file holding the mnemonic phrase
    pub mnemonic: PathBuf,
    /// Derivation index below `m/44'/60'/0'/0/`
    #[serde(default)]
    pub account: u32,
    /// Confirmation polling settings
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    /// Default filter directive, e.g. `info` or `ccnft=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Confirmation polling settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationConfig {
    /// Interval between transaction lookups, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Give up waiting after this many seconds (unbounded when absent)
    #[serde(default)]
    pub max_wait_secs: Option<u64>,
    /// Consecutive "not found" lookups before the transaction counts as dropped
    #[serde(default = "default_drop_after_misses")]
    pub drop_after_misses: u32,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_wait_secs: None,
            drop_after_misses: default_drop_after_misses(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_drop_after_misses() -> u32 {
    DEFAULT_DROP_AFTER_MISSES
}

impl ConfirmationConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Read and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("read {}: {e}", path.display())))?;
        Self::from_json(&raw).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(raw).map_err(|e| Error::config(format!("parse: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the RPC URL
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc = rpc_url.into();
        self
    }

    fn validate(&self) -> Result<()> {
        self.rpc_url()?;
        self.contract_address()?;
        if self.confirmation.poll_interval_ms == 0 {
            return Err(Error::config("confirmation.pollIntervalMs must be positive"));
        }
        Ok(())
    }

    /// Parsed RPC endpoint
    pub fn rpc_url(&self) -> Result<Url> {
        self.rpc
            .parse()
            .map_err(|e| Error::config(format!("invalid rpc url {:?}: {e}", self.rpc)))
    }

    /// Parsed contract address
    pub fn contract_address(&self) -> Result<Address> {
        self.contract
            .trim()
            .parse()
            .map_err(|e| Error::config(format!("invalid contract address {:?}: {e}", self.contract)))
    }
}
