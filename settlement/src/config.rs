//! Service configuration
//!
//! Loaded from a TOML file or from environment variables, with
//! defaults suitable for local development.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Top-level settlement service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service identifier used in logs.
    pub service_name: String,
    /// Service version reported at startup.
    pub service_version: String,
    /// Currency codes registered at startup.
    pub currencies: Vec<String>,
    /// Bounded capacity of the ledger actor mailbox.
    pub mailbox_capacity: usize,
    /// Oracle adapter tuning.
    pub oracle: OracleConfig,
}

/// Oracle adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Per-feed read timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum accepted quote age in seconds.
    pub max_age_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "settlement".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            currencies: vec!["INR".to_string(), "BDT".to_string()],
            mailbox_capacity: 1000,
            oracle: OracleConfig::default(),
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            max_age_secs: 300,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("invalid config: {e}")))
    }

    /// Load configuration from the environment, falling back to defaults.
    ///
    /// `SETTLEMENT_CONFIG` names a TOML file; individual
    /// `SETTLEMENT_*` variables override single fields.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("SETTLEMENT_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        if let Ok(name) = std::env::var("SETTLEMENT_SERVICE_NAME") {
            config.service_name = name;
        }
        if let Ok(raw) = std::env::var("SETTLEMENT_CURRENCIES") {
            config.currencies = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(raw) = std::env::var("SETTLEMENT_MAILBOX_CAPACITY") {
            config.mailbox_capacity = raw
                .parse()
                .map_err(|e| Error::Config(format!("invalid mailbox capacity: {e}")))?;
        }
        if let Ok(raw) = std::env::var("SETTLEMENT_ORACLE_TIMEOUT_MS") {
            config.oracle.timeout_ms = raw
                .parse()
                .map_err(|e| Error::Config(format!("invalid oracle timeout: {e}")))?;
        }
        if let Ok(raw) = std::env::var("SETTLEMENT_ORACLE_MAX_AGE_SECS") {
            config.oracle.max_age_secs = raw
                .parse()
                .map_err(|e| Error::Config(format!("invalid oracle max age: {e}")))?;
        }
        Ok(config)
    }
}
