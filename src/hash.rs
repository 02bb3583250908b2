//! Content hashes and the proof-of-work difficulty predicate

use crate::error::ChainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of leading zero bytes a hash needs to meet the difficulty target.
pub const DIFFICULTY_BYTES: usize = 3;

/// Raw SHA-256 output, as produced by the block digest.
pub type Sha256Hash = [u8; 32];

/// An immutable byte sequence produced by a digest.
///
/// Equality is byte-for-byte, so hashes of different lengths never compare
/// equal. The bytes are copied in on construction and never change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hash(Box<[u8]>);

impl Hash {
    /// Copies `bytes` into a new hash.
    pub fn new(bytes: &[u8]) -> Self {
        Hash(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True iff the hash has at least [`DIFFICULTY_BYTES`] bytes and all of
    /// the leading ones are zero.
    pub fn is_valid(&self) -> bool {
        self.0.len() >= DIFFICULTY_BYTES && self.0[..DIFFICULTY_BYTES].iter().all(|&b| b == 0)
    }

    /// Lower-case hex, two characters per byte.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Sha256Hash> for Hash {
    fn from(bytes: Sha256Hash) -> Self {
        Hash(Box::new(bytes))
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Hash {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| ChainError::InvalidHash(format!("'{}' is not a hex string: {}", s, e)))?;
        Ok(Hash(bytes.into_boxed_slice()))
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
