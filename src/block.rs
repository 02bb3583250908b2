//! Block structure and the block digest
//!
//! A block commits `number || amount || previous_hash? || nonce`, serialized
//! as big-endian fixed-width integers, to a SHA-256 digest. The genesis block
//! has no previous hash and contributes no bytes for it.

use crate::error::Result;
use crate::hash::{Hash, Sha256Hash};
use crate::miner::Miner;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    number: u32,
    amount: i32,
    previous_hash: Option<Hash>,
    nonce: i64,
    hash: Hash,
}

impl Block {
    /// Mines a block with the default, unbounded miner.
    ///
    /// Nonces are tried in increasing order from `i64::MIN`, so mining the
    /// same inputs twice yields the same nonce and hash.
    pub fn mine(number: u32, amount: i32, previous_hash: Option<Hash>) -> Result<Self> {
        Miner::default().mine(number, amount, previous_hash)
    }

    /// Rebuilds a block from a known nonce with a single digest.
    ///
    /// The resulting hash is not checked against the difficulty target;
    /// callers must validate the block before trusting it.
    pub fn from_nonce(number: u32, amount: i32, previous_hash: Option<Hash>, nonce: i64) -> Self {
        let hash = Self::compute_hash(number, amount, previous_hash.as_ref(), nonce);
        Block {
            number,
            amount,
            previous_hash,
            nonce,
            hash,
        }
    }

    /// Assembles a block from stored fields without recomputing its hash.
    ///
    /// Used for blocks coming from an untrusted source; `has_consistent_hash`
    /// tells whether the stored hash matches the contents.
    pub fn from_parts(
        number: u32,
        amount: i32,
        previous_hash: Option<Hash>,
        nonce: i64,
        hash: Hash,
    ) -> Self {
        Block {
            number,
            amount,
            previous_hash,
            nonce,
            hash,
        }
    }

    /// Digest state after absorbing everything but the nonce.
    pub(crate) fn digest_prefix(number: u32, amount: i32, previous_hash: Option<&Hash>) -> Sha256 {
        let mut hasher = Sha256::new();
        hasher.update(number.to_be_bytes());
        hasher.update(amount.to_be_bytes());
        if let Some(prev) = previous_hash {
            hasher.update(prev.as_bytes());
        }
        hasher
    }

    /// Finishes a digest started by [`Block::digest_prefix`].
    pub(crate) fn finish_digest(mut hasher: Sha256, nonce: i64) -> Hash {
        hasher.update(nonce.to_be_bytes());
        let digest: Sha256Hash = hasher.finalize().into();
        Hash::from(digest)
    }

    pub fn compute_hash(number: u32, amount: i32, previous_hash: Option<&Hash>, nonce: i64) -> Hash {
        Self::finish_digest(Self::digest_prefix(number, amount, previous_hash), nonce)
    }

    pub fn recompute_hash(&self) -> Hash {
        Self::compute_hash(self.number, self.amount, self.previous_hash.as_ref(), self.nonce)
    }

    pub fn has_consistent_hash(&self) -> bool {
        self.recompute_hash() == self.hash
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }

    pub fn nonce(&self) -> i64 {
        self.nonce
    }

    pub fn previous_hash(&self) -> Option<&Hash> {
        self.previous_hash.as_ref()
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.number == 0 && self.previous_hash.is_none()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block {} (Amount: {}, Nonce: {}, prevHash: ",
            self.number, self.amount, self.nonce
        )?;
        match &self.previous_hash {
            Some(prev) => write!(f, "{}", prev)?,
            None => f.write_str("none")?,
        }
        write!(f, ", hash: {})", self.hash)
    }
}
