//! Configuration management for the demo binary

use crate::error::LedgerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Deserialize)]
pub struct LedgerConfig {
    /// Value minted by the genesis block, in smallest units
    #[serde(default = "default_initial_supply")]
    pub initial_supply: u64,
}

#[derive(Debug, Deserialize)]
pub struct DemoConfig {
    /// Amount the demo transaction sends
    #[serde(default = "default_amount")]
    pub amount: u64,
    /// Fee the demo transaction pays
    #[serde(default = "default_fee")]
    pub fee: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_supply: default_initial_supply(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            amount: default_amount(),
            fee: default_fee(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

/// Load configuration from the given TOML file, falling back to defaults
/// when the file is absent or empty.
pub fn load_config(path: &Path) -> Result<Config, LedgerError> {
    let config_str = fs::read_to_string(path).unwrap_or_default();
    if config_str.is_empty() {
        return Ok(Config::default());
    }

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| LedgerError::ConfigError(format!("Failed to parse {}: {}", path.display(), e)))?;

    if config.ledger.initial_supply == 0 {
        return Err(LedgerError::ConfigError(
            "ledger.initial_supply must be greater than zero".to_string(),
        ));
    }

    Ok(config)
}

fn default_initial_supply() -> u64 {
    1_000_000
}

fn default_amount() -> u64 {
    123_456
}

fn default_fee() -> u64 {
    10_000
}
