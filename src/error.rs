//! Error types for LedgerChain

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Invalid proof of work: hash {hash} does not meet the difficulty target")]
    InvalidProofOfWork { hash: String },

    #[error("Hash mismatch: contents hash to {expected}, but block claims {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("Invalid block linkage: expected previous hash {expected}, but got {actual}")]
    InvalidBlockLinkage { expected: String, actual: String },

    #[error("Invalid block height: expected {expected}, but got {actual}")]
    InvalidBlockHeight { expected: u32, actual: u32 },

    #[error("Invalid genesis block: {0}")]
    InvalidGenesis(String),

    #[error("Balance out of range at block {number}: {balance} is outside [0, {ceiling}]")]
    BalanceOutOfRange { number: u32, balance: i64, ceiling: i64 },

    #[error("Mining gave up after {trials} trials without a valid hash")]
    MiningExhausted { trials: u64 },

    #[error("A chain needs at least a genesis block")]
    EmptyChain,

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
