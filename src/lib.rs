//! LedgerChain - A minimal proof-of-work ledger of two-party transfers
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Blockchain
//! - [`hash`] - Content hashes and the difficulty predicate
//! - [`block`] - Block structure and digest
//! - [`blockchain`] - Chain management, validation and balances
//!
//! ## Consensus
//! - [`miner`] - Proof-of-work mining
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - Interactive command shell

#![forbid(unsafe_code)]

// ============================================================================
// Core Blockchain
// ============================================================================
pub mod block;
pub mod blockchain;
pub mod hash;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod miner;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;

pub use block::Block;
pub use blockchain::{Balances, Blockchain};
pub use error::{ChainError, Result};
pub use hash::Hash;
pub use miner::Miner;
