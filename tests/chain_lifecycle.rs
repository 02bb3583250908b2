//! Integration tests for mining, appending and validating a ledger chain
//!
//! Every mined block costs about 2^24 digests, so the honest chains are
//! mined once and shared between tests.

use ledgerchain::{Balances, Block, Blockchain, ChainError, Hash};
use once_cell::sync::Lazy;

/// Genesis 300, then -50 and +20.
static LEDGER: Lazy<Blockchain> = Lazy::new(|| {
    let mut chain = Blockchain::new(300).expect("genesis");
    let first = chain.mine_next(-50).expect("mine first");
    chain.append(first).expect("append first");
    let second = chain.mine_next(20).expect("mine second");
    chain.append(second).expect("append second");
    chain
});

/// A block mined on top of the genesis of `LEDGER`, for a chain that has
/// already moved past it.
static STALE: Lazy<Block> = Lazy::new(|| {
    Block::mine(1, -10, Some(LEDGER.genesis().hash().clone())).expect("mine stale")
});

fn blocks_of(chain: &Blockchain) -> Vec<Block> {
    chain.iter().cloned().collect()
}

#[test]
fn test_honest_chain_is_valid() {
    let chain = &*LEDGER;
    assert_eq!(chain.size(), 3);
    assert!(chain.is_valid());
    assert_eq!(chain.validate(), Ok(()));

    for (i, block) in chain.iter().enumerate() {
        assert_eq!(block.number() as usize, i);
        assert!(block.hash().is_valid());
        assert!(block.has_consistent_hash());
    }
    assert!(chain.genesis().is_genesis());
}

#[test]
fn test_scenario_balances() {
    let balances = LEDGER.balances();
    assert_eq!(balances, Balances { payer: 270, payee: 30 });
    assert_eq!(balances.total(), 300);

    let amounts: i64 = LEDGER.iter().map(|b| i64::from(b.amount())).sum();
    assert_eq!(balances.payer, amounts);
}

#[test]
fn test_tampered_amount_invalidates_chain() {
    let mut blocks = blocks_of(&LEDGER);
    let honest = blocks[1].clone();
    blocks[1] = Block::from_parts(
        honest.number(),
        -9999,
        honest.previous_hash().cloned(),
        honest.nonce(),
        honest.hash().clone(),
    );

    let tampered = Blockchain::from_blocks(blocks).unwrap();
    assert!(!tampered.is_valid());
    assert!(matches!(
        tampered.validate(),
        Err(ChainError::HashMismatch { .. }) | Err(ChainError::InvalidProofOfWork { .. })
    ));
}

#[test]
fn test_mined_block_replays_from_nonce() {
    for block in LEDGER.iter() {
        let replayed = Block::from_nonce(
            block.number(),
            block.amount(),
            block.previous_hash().cloned(),
            block.nonce(),
        );
        assert_eq!(&replayed, block);
    }
}

#[test]
fn test_mine_next_does_not_mutate() {
    let mut chain = LEDGER.clone();
    let removed = chain.tail().clone();
    assert!(chain.remove_last());
    let tail = chain.tail_hash().clone();

    // Mining the same position again yields the same block
    let candidate = chain.mine_next(20).unwrap();
    assert_eq!(candidate, removed);
    assert_eq!(candidate.number(), 2);
    assert_eq!(candidate.previous_hash(), Some(&tail));

    assert_eq!(chain.tail_hash(), &tail);
    assert_eq!(chain.size(), 2);
}

#[test]
fn test_append_requires_link_to_tail() {
    let mut chain = LEDGER.clone();
    let stale = STALE.clone();
    assert!(stale.hash().is_valid());

    let result = chain.append(stale);
    assert_eq!(
        result,
        Err(ChainError::InvalidBlockLinkage {
            expected: LEDGER.tail_hash().to_hex(),
            actual: LEDGER.genesis().hash().to_hex(),
        })
    );
    assert_eq!(chain.size(), 3);
    assert_eq!(chain.tail_hash(), LEDGER.tail_hash());
}

#[test]
fn test_append_requires_proof_of_work() {
    let mut chain = LEDGER.clone();
    // Correct link, but a nonce that was never mined
    let lazy = Block::from_nonce(3, 5, Some(chain.tail_hash().clone()), 0);
    assert!(matches!(
        chain.append(lazy),
        Err(ChainError::InvalidProofOfWork { .. })
    ));
    assert_eq!(chain.size(), 3);
}

#[test]
fn test_append_rejects_forged_hash() {
    let mut chain = LEDGER.clone();
    let forged = Block::from_parts(
        3,
        5,
        Some(chain.tail_hash().clone()),
        0,
        Hash::from([0u8; 32]),
    );
    assert!(matches!(
        chain.append(forged),
        Err(ChainError::HashMismatch { .. })
    ));
    assert_eq!(chain.size(), 3);
}

#[test]
fn test_append_after_remove_restores_chain() {
    let mut chain = LEDGER.clone();
    let tail = chain.tail().clone();

    assert!(chain.remove_last());
    assert_eq!(chain.size(), 2);
    assert_eq!(chain.tail_hash(), tail.previous_hash().unwrap());

    // The stale block extends the genesis, not the new tail
    assert!(chain.append(STALE.clone()).is_err());

    chain.append(tail).unwrap();
    assert_eq!(chain.size(), 3);
    assert!(chain.is_valid());
}

#[test]
fn test_stale_block_extends_trimmed_chain() {
    let mut chain = LEDGER.clone();
    assert!(chain.remove_last());
    assert!(chain.remove_last());
    assert!(!chain.remove_last());
    assert_eq!(chain.size(), 1);

    chain.append(STALE.clone()).unwrap();
    assert_eq!(chain.size(), 2);
    assert!(chain.is_valid());
    assert_eq!(chain.balances(), Balances { payer: 290, payee: 10 });
}

#[test]
fn test_overdraft_is_appended_but_invalid() {
    let mut chain = LEDGER.clone();
    // Balance is 270; -271 would drive it below zero
    let overdraft = chain.mine_next(-271).unwrap();
    chain.append(overdraft).unwrap();
    assert_eq!(chain.size(), 4);
    assert!(!chain.is_valid());
    assert_eq!(
        chain.validate(),
        Err(ChainError::BalanceOutOfRange { number: 3, balance: -1, ceiling: 300 })
    );

    assert!(chain.remove_last());
    assert!(chain.is_valid());
}

#[test]
fn test_exceeding_genesis_amount_is_invalid() {
    let mut chain = LEDGER.clone();
    // Balance is 270; +31 would exceed the genesis amount
    let surplus = chain.mine_next(31).unwrap();
    chain.append(surplus).unwrap();
    assert_eq!(
        chain.validate(),
        Err(ChainError::BalanceOutOfRange { number: 3, balance: 301, ceiling: 300 })
    );
}

#[test]
fn test_render_lists_blocks_in_order() {
    let rendered = LEDGER.render();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    for (line, block) in lines.iter().zip(LEDGER.iter()) {
        assert_eq!(*line, block.to_string());
    }
    assert!(lines[0].contains("prevHash: none"));
    assert!(lines[1].contains(&format!("prevHash: {}", LEDGER.genesis().hash())));
}
