use crate::transaction::Transaction;
use shared::Hash256;

/// Fixed sentinel acting as the parent id of the first real block on any
/// chain. Distinguishable from any realizable Keccak-256 output (the
/// all-zero bit-string). It is not itself a block — `BlockStore::get`
/// fails for it — but `BlockStore::height_of`/`snapshot_of` treat it as
/// height 0 with an empty UTXO snapshot.
pub const GENESIS_PREV: Hash256 = Hash256::zero();

/// A batch of transactions chained to a predecessor by content hash.
///
/// There is no header, no difficulty, no nonce: ordering comes purely
/// from the fork-aware store's height bookkeeping, not from proof of
/// work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub prev_block_id: Hash256,
    pub transactions: Vec<Transaction>,
}

impl Block {
    #[must_use]
    pub const fn new(prev_block_id: Hash256, transactions: Vec<Transaction>) -> Self {
        Self {
            prev_block_id,
            transactions,
        }
    }

    /// The block id: `keccak256(prev_block_id ‖ txid(t_0) ‖ … ‖ txid(t_n))`.
    /// Recomputed on demand, never cached, so a block can never drift
    /// from its own identity.
    #[must_use]
    pub fn block_id(&self) -> Hash256 {
        let mut preimage = Vec::with_capacity(32 + self.transactions.len() * 32);
        preimage.extend_from_slice(self.prev_block_id.as_bytes());
        for tx in &self.transactions {
            preimage.extend_from_slice(tx.txid().as_bytes());
        }
        Hash256::keccak256(&preimage)
    }
}
