use crate::block::Block;
use crate::config::PartyConfig;
use crate::error::ChainError;
use serde::{Deserialize, Serialize};

/// Balances of the two parties of the ledger.
///
/// The genesis amount belongs to the payer; every later block moves its
/// amount between the two, so `payer + payee` always equals the genesis
/// amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    pub payer: i64,
    pub payee: i64,
}

impl Balances {
    pub fn from_blocks<'a, I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = &'a Block>,
    {
        let mut iter = blocks.into_iter();
        let initial = iter.next().map_or(0, |genesis| i64::from(genesis.amount()));
        let transferred: i64 = iter.map(|b| i64::from(b.amount())).sum();
        Balances {
            payer: initial + transferred,
            payee: -transferred,
        }
    }

    pub fn total(&self) -> i64 {
        self.payer + self.payee
    }

    /// Renders `<payer>: <amt>, <payee>: <amt>`.
    pub fn report(&self, parties: &PartyConfig) -> String {
        format!(
            "{}: {}, {}: {}",
            parties.payer, self.payer, parties.payee, self.payee
        )
    }
}

/// Prefix sum of block amounts, bounded by `[0, ceiling]`.
///
/// The ceiling is the genesis amount; applying the genesis block itself
/// brings the balance from zero up to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningBalance {
    ceiling: i64,
    balance: i64,
}

impl RunningBalance {
    pub fn new(genesis: &Block) -> Self {
        Self {
            ceiling: i64::from(genesis.amount()),
            balance: 0,
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn ceiling(&self) -> i64 {
        self.ceiling
    }

    /// Adds the block's amount and checks the bounds.
    pub fn apply(&mut self, block: &Block) -> Result<i64, ChainError> {
        self.balance = self.balance.saturating_add(i64::from(block.amount()));
        if self.balance < 0 || self.balance > self.ceiling {
            return Err(ChainError::BalanceOutOfRange {
                number: block.number(),
                balance: self.balance,
                ceiling: self.ceiling,
            });
        }
        Ok(self.balance)
    }
}
