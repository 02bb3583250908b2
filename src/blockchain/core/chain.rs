use super::state::Balances;
use super::validation::{validate_append, validate_chain};
use crate::block::Block;
use crate::error::{ChainError, Result};
use crate::hash::Hash;
use crate::miner::Miner;
use std::fmt;
use tracing::{info, warn};

/// An append-only chain of blocks anchored by a genesis block.
///
/// The genesis block is held apart from its successors so the tail always
/// exists; removing the tail is a pop.
#[derive(Debug, Clone)]
pub struct Blockchain {
    genesis: Block,
    blocks: Vec<Block>,
    miner: Miner,
}

impl Blockchain {
    /// Create a new `Blockchain` by mining a genesis block holding
    /// `initial_amount`.
    ///
    /// The amount is not checked here; rejecting negative funds is up to the
    /// caller.
    pub fn new(initial_amount: i32) -> Result<Self> {
        Self::with_miner(initial_amount, Miner::default())
    }

    /// Create a new `Blockchain` that mines with the provided miner.
    pub fn with_miner(initial_amount: i32, miner: Miner) -> Result<Self> {
        let genesis = miner.mine(0, initial_amount, None)?;
        info!(
            "Created chain with genesis amount {} (nonce {})",
            initial_amount,
            genesis.nonce()
        );
        Ok(Blockchain {
            genesis,
            blocks: Vec::new(),
            miner,
        })
    }

    /// Rebuild a chain from blocks of unknown provenance.
    ///
    /// Only an empty list is refused; use [`Blockchain::validate`] to find
    /// out whether the blocks form a valid chain.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self> {
        let mut iter = blocks.into_iter();
        let genesis = iter.next().ok_or(ChainError::EmptyChain)?;
        Ok(Blockchain {
            genesis,
            blocks: iter.collect(),
            miner: Miner::default(),
        })
    }

    pub fn miner(&self) -> &Miner {
        &self.miner
    }

    pub fn set_miner(&mut self, miner: Miner) {
        self.miner = miner;
    }

    pub fn genesis(&self) -> &Block {
        &self.genesis
    }

    pub fn tail(&self) -> &Block {
        self.blocks.last().unwrap_or(&self.genesis)
    }

    pub fn tail_hash(&self) -> &Hash {
        self.tail().hash()
    }

    /// Number of blocks, genesis included.
    pub fn size(&self) -> usize {
        self.blocks.len() + 1
    }

    /// Number the next block must carry.
    pub fn next_number(&self) -> u32 {
        self.tail().number().saturating_add(1)
    }

    /// Blocks from genesis to tail.
    pub fn iter(&self) -> impl Iterator<Item = &Block> + '_ {
        std::iter::once(&self.genesis).chain(self.blocks.iter())
    }

    /// Mines a candidate block on top of the tail without adding it.
    pub fn mine_next(&self, amount: i32) -> Result<Block> {
        self.miner
            .mine(self.next_number(), amount, Some(self.tail_hash().clone()))
    }

    /// Adds `block` as the new tail.
    ///
    /// Rejects blocks that miss the difficulty target, whose hash does not
    /// match their contents, or that do not extend the current tail. A
    /// rejected block leaves the chain unchanged.
    pub fn append(&mut self, block: Block) -> Result<()> {
        if let Err(e) = validate_append(self.tail(), &block) {
            warn!("Rejected block {}: {}", block.number(), e);
            return Err(e);
        }
        info!("Appended block {} (amount {})", block.number(), block.amount());
        self.blocks.push(block);
        Ok(())
    }

    /// Drops the tail block. Returns false when only genesis is left.
    pub fn remove_last(&mut self) -> bool {
        match self.blocks.pop() {
            Some(removed) => {
                info!("Removed block {}", removed.number());
                true
            }
            None => false,
        }
    }

    /// Checks every block's proof of work, the links between blocks and the
    /// running balance, reporting the first problem found.
    pub fn validate(&self) -> Result<()> {
        validate_chain(self.iter())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn balances(&self) -> Balances {
        Balances::from_blocks(self.iter())
    }

    /// One line per block, genesis first.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Blockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in self.iter() {
            writeln!(f, "{}", block)?;
        }
        Ok(())
    }
}
