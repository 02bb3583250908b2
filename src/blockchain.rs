// Thin re-export module: the chain lives in `blockchain/core.rs`, split into
// chain management, append/chain validation and balance accounting.

pub mod core;
pub use self::core::*;
