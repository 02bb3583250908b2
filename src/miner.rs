//! Proof-of-work mining
//!
//! Nonces are searched in increasing order starting at `start_nonce`. The
//! digest of `number || amount || previous_hash?` is computed once and cloned
//! for every candidate.

use crate::block::Block;
use crate::error::{ChainError, Result};
use crate::hash::Hash;
use tracing::{debug, trace};

/// Trials between progress traces.
const PROGRESS_INTERVAL: u64 = 1 << 22;

/// A nonce search with an optional trial cap.
///
/// The default starts at `i64::MIN` and never gives up before the nonce range
/// ends, which in practice means it always finds a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Miner {
    pub start_nonce: i64,
    pub max_trials: Option<u64>,
}

impl Default for Miner {
    fn default() -> Self {
        Self {
            start_nonce: i64::MIN,
            max_trials: None,
        }
    }
}

impl Miner {
    pub fn new(start_nonce: i64, max_trials: Option<u64>) -> Self {
        Self {
            start_nonce,
            max_trials,
        }
    }

    pub fn with_start_nonce(mut self, start_nonce: i64) -> Self {
        self.start_nonce = start_nonce;
        self
    }

    pub fn with_max_trials(mut self, max_trials: u64) -> Self {
        self.max_trials = Some(max_trials);
        self
    }

    /// Searches for the first nonce whose block hash meets the difficulty
    /// target.
    ///
    /// Fails with [`ChainError::MiningExhausted`] once `max_trials` candidates
    /// were tried or the search runs past `i64::MAX`.
    pub fn mine(&self, number: u32, amount: i32, previous_hash: Option<Hash>) -> Result<Block> {
        let prefix = Block::digest_prefix(number, amount, previous_hash.as_ref());
        let mut nonce = self.start_nonce;
        let mut trials: u64 = 0;

        loop {
            if self.max_trials.is_some_and(|max| trials >= max) {
                return Err(ChainError::MiningExhausted { trials });
            }
            trials += 1;

            let hash = Block::finish_digest(prefix.clone(), nonce);
            if hash.is_valid() {
                debug!(number, amount, nonce, trials, "Mined block {}", hash);
                return Ok(Block::from_parts(number, amount, previous_hash, nonce, hash));
            }
            if trials % PROGRESS_INTERVAL == 0 {
                trace!(number, trials, "Still mining");
            }

            nonce = match nonce.checked_add(1) {
                Some(next) => next,
                None => return Err(ChainError::MiningExhausted { trials }),
            };
        }
    }
}
