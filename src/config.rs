//! Configuration management for LedgerChain
//!
//! Read from a TOML file; every key is optional and a missing file means
//! defaults:
//!
//! ```toml
//! [parties]
//! payer = "Alexis"
//! payee = "Blake"
//!
//! [miner]
//! start_nonce = -9223372036854775808
//! max_trials = 100000000
//! ```

use crate::error::{ChainError, Result};
use crate::miner::Miner;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "ledger.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parties: PartyConfig,
    #[serde(default)]
    pub miner: MinerConfig,
}

/// Display names of the two ledger parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyConfig {
    #[serde(default = "default_payer")]
    pub payer: String,
    #[serde(default = "default_payee")]
    pub payee: String,
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            payer: default_payer(),
            payee: default_payee(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerConfig {
    #[serde(default = "default_start_nonce")]
    pub start_nonce: i64,
    #[serde(default)]
    pub max_trials: Option<u64>,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            start_nonce: default_start_nonce(),
            max_trials: None,
        }
    }
}

impl MinerConfig {
    pub fn miner(&self) -> Miner {
        Miner::new(self.start_nonce, self.max_trials)
    }
}

fn default_payer() -> String {
    "Alexis".to_string()
}

fn default_payee() -> String {
    "Blake".to_string()
}

fn default_start_nonce() -> i64 {
    i64::MIN
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.parties.payer.trim().is_empty() {
            return Err(ChainError::ConfigError("parties.payer must not be empty".into()));
        }
        if self.parties.payee.trim().is_empty() {
            return Err(ChainError::ConfigError("parties.payee must not be empty".into()));
        }
        if self.miner.max_trials == Some(0) {
            return Err(ChainError::ConfigError(
                "miner.max_trials must be positive when set".into(),
            ));
        }
        Ok(())
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config = match fs::read_to_string(path) {
        Ok(contents) => toml::from_str::<Config>(&contents)?,
        // Sane defaults when the file is absent
        Err(e) if e.kind() == ErrorKind::NotFound => Config::default(),
        Err(e) => return Err(e.into()),
    };

    config.validate()?;
    Ok(config)
}
