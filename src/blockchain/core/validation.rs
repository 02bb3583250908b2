use super::state::RunningBalance;
use crate::block::Block;
use crate::error::ChainError;

/// Checks that a block's hash meets the difficulty target and matches its
/// contents.
pub fn validate_block_hash(block: &Block) -> Result<(), ChainError> {
    if !block.hash().is_valid() {
        return Err(ChainError::InvalidProofOfWork {
            hash: block.hash().to_hex(),
        });
    }

    let expected = block.recompute_hash();
    if &expected != block.hash() {
        return Err(ChainError::HashMismatch {
            expected: expected.to_hex(),
            actual: block.hash().to_hex(),
        });
    }
    Ok(())
}

/// Checks that `child` directly follows `parent`.
pub fn validate_link(parent: &Block, child: &Block) -> Result<(), ChainError> {
    if child.previous_hash() != Some(parent.hash()) {
        return Err(ChainError::InvalidBlockLinkage {
            expected: parent.hash().to_hex(),
            actual: child
                .previous_hash()
                .map_or_else(|| "none".to_string(), |h| h.to_hex()),
        });
    }

    if u64::from(child.number()) != u64::from(parent.number()) + 1 {
        return Err(ChainError::InvalidBlockHeight {
            expected: parent.number().saturating_add(1),
            actual: child.number(),
        });
    }
    Ok(())
}

pub fn validate_genesis(genesis: &Block) -> Result<(), ChainError> {
    if genesis.number() != 0 {
        return Err(ChainError::InvalidGenesis(format!(
            "expected number 0, but got {}",
            genesis.number()
        )));
    }
    if let Some(prev) = genesis.previous_hash() {
        return Err(ChainError::InvalidGenesis(format!(
            "genesis must not have a previous hash, but has {}",
            prev
        )));
    }
    Ok(())
}

/// The gate every new tail passes through.
pub fn validate_append(tail: &Block, candidate: &Block) -> Result<(), ChainError> {
    validate_block_hash(candidate)?;
    validate_link(tail, candidate)
}

/// Walks a chain from genesis to tail, checking every block's hash, the
/// linkage between neighbours and the running balance.
pub fn validate_chain<'a, I>(blocks: I) -> Result<(), ChainError>
where
    I: IntoIterator<Item = &'a Block>,
{
    let mut iter = blocks.into_iter();
    let genesis = iter.next().ok_or(ChainError::EmptyChain)?;
    validate_genesis(genesis)?;

    let mut running = RunningBalance::new(genesis);
    let mut parent: Option<&Block> = None;

    for block in std::iter::once(genesis).chain(iter) {
        validate_block_hash(block)?;
        if let Some(parent) = parent {
            validate_link(parent, block)?;
        }
        running.apply(block)?;
        parent = Some(block);
    }
    Ok(())
}
