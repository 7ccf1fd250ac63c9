use crate::block::Block;
use crate::config::NodeConfig;
use crate::utxo::UtxoSnapshot;
use std::collections::HashSet;

/// Validates `block` against its parent's UTXO snapshot, purely — no
/// store lookups, no side effects. On success, returns the snapshot that
/// results from applying the block.
///
/// Rules: the transaction list is non-empty and within `config.block_size`;
/// exactly one transaction in the block is a coinbase — its position is
/// unconstrained, conventionally first but not required to be; every other
/// transaction spends a distinct input that exists in `parent` and carries
/// a signature matching that input's owner.
#[must_use]
pub fn validate_block(
    block: &Block,
    parent: &UtxoSnapshot,
    config: &NodeConfig,
) -> Option<UtxoSnapshot> {
    if block.transactions.is_empty() || block.transactions.len() > config.block_size {
        return None;
    }
    if block.transactions.iter().filter(|tx| tx.is_coinbase()).count() != 1 {
        return None;
    }

    let mut spent = HashSet::new();
    for tx in &block.transactions {
        if tx.is_coinbase() {
            continue;
        }
        let input = tx.input?;
        if !spent.insert(input) {
            return None;
        }
        let spent_tx = parent.get(&input)?;
        if !tx.verify_signature(&spent_tx.output) {
            return None;
        }
    }

    Some(parent.apply(&block.transactions))
}
