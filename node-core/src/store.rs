use crate::block::{Block, GENESIS_PREV};
use crate::config::NodeConfig;
use crate::utxo::UtxoSnapshot;
use crate::validator::validate_block;
use shared::Hash256;
use std::collections::HashMap;
use tracing::{debug, warn};

struct Entry {
    block: Block,
    height: u64,
    snapshot: UtxoSnapshot,
}

/// Every block a node has ever validated, across every fork it has seen.
///
/// Nothing is ever evicted — a fork that loses the chain-selection race
/// stays in the store, in case it wins a later race after the winning
/// fork stalls. Each entry carries its own UTXO snapshot, so switching
/// tips never requires replaying history.
///
/// `GENESIS_PREV` itself is never an entry: it's the implicit parent of
/// every chain's first real block, not a block the store ever stores or
/// can `get`.
#[derive(Default)]
pub struct BlockStore {
    entries: HashMap<Hash256, Entry>,
}

impl BlockStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has(&self, id: &Hash256) -> bool {
        self.entries.contains_key(id)
    }

    /// Fails for any id this store has never validated — including
    /// `GENESIS_PREV`, which was never a block to begin with.
    #[must_use]
    pub fn get(&self, id: &Hash256) -> Option<&Block> {
        self.entries.get(id).map(|entry| &entry.block)
    }

    /// Defined for `GENESIS_PREV` (height 0) as well as every stored id.
    #[must_use]
    pub fn height_of(&self, id: &Hash256) -> Option<u64> {
        if *id == GENESIS_PREV {
            return Some(0);
        }
        self.entries.get(id).map(|entry| entry.height)
    }

    /// Defined for `GENESIS_PREV` (the empty snapshot) as well as every
    /// stored id.
    #[must_use]
    pub fn snapshot_of(&self, id: &Hash256) -> Option<UtxoSnapshot> {
        if *id == GENESIS_PREV {
            return Some(UtxoSnapshot::empty());
        }
        self.entries.get(id).map(|entry| entry.snapshot.clone())
    }

    /// Validates `block` against its already-stored parent — or, if the
    /// parent is `GENESIS_PREV`, against height 0 and the empty snapshot
    /// — and if valid, stores it at `parent_height + 1`. Returns `true`
    /// if the block ends up in the store, whether because it was just
    /// validated or because it was already known.
    pub fn put(&mut self, block: Block, config: &NodeConfig) -> bool {
        let id = block.block_id();
        if self.entries.contains_key(&id) {
            return true;
        }
        let Some((parent_height, parent_snapshot)) = self.parent_state(&block.prev_block_id)
        else {
            warn!(block_id = %id, "rejecting block with unknown parent");
            return false;
        };

        let Some(snapshot) = validate_block(&block, &parent_snapshot, config) else {
            warn!(block_id = %id, "rejecting invalid block");
            return false;
        };

        debug!(block_id = %id, height = parent_height + 1, "stored validated block");
        self.entries.insert(
            id,
            Entry {
                block,
                height: parent_height + 1,
                snapshot,
            },
        );
        true
    }

    fn parent_state(&self, id: &Hash256) -> Option<(u64, UtxoSnapshot)> {
        if *id == GENESIS_PREV {
            return Some((0, UtxoSnapshot::empty()));
        }
        self.entries
            .get(id)
            .map(|entry| (entry.height, entry.snapshot.clone()))
    }

    /// Every known block id paired with its height — the raw material the
    /// chain selector scans.
    pub fn heights(&self) -> impl Iterator<Item = (&Hash256, u64)> {
        self.entries.iter().map(|(id, entry)| (id, entry.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;

    #[test]
    fn genesis_sentinel_has_height_zero_and_empty_snapshot_but_is_not_a_block() {
        let store = BlockStore::new();
        assert_eq!(store.height_of(&GENESIS_PREV), Some(0));
        assert!(store.snapshot_of(&GENESIS_PREV).unwrap().is_empty());
        assert!(store.get(&GENESIS_PREV).is_none());
        assert!(!store.has(&GENESIS_PREV));
    }

    #[test]
    fn put_rejects_block_with_unknown_parent() {
        let mut store = BlockStore::new();
        let orphan = Block::new(
            Hash256::keccak256(b"nowhere"),
            vec![Transaction::new_coinbase(vec![1])],
        );
        assert!(!store.put(orphan, &NodeConfig::default()));
    }

    #[test]
    fn put_accepts_and_stores_child_of_genesis_sentinel() {
        let mut store = BlockStore::new();
        let child = Block::new(GENESIS_PREV, vec![Transaction::new_coinbase(vec![1])]);
        let child_id = child.block_id();
        assert!(store.put(child, &NodeConfig::default()));
        assert_eq!(store.height_of(&child_id), Some(1));
    }

    #[test]
    fn put_is_idempotent_for_already_known_block() {
        let mut store = BlockStore::new();
        let child = Block::new(GENESIS_PREV, vec![Transaction::new_coinbase(vec![1])]);
        assert!(store.put(child.clone(), &NodeConfig::default()));
        assert!(store.put(child, &NodeConfig::default()));
    }

    #[test]
    fn store_supports_simultaneous_forks() {
        let mut store = BlockStore::new();
        let fork_a = Block::new(GENESIS_PREV, vec![Transaction::new_coinbase(vec![1])]);
        let fork_b = Block::new(GENESIS_PREV, vec![Transaction::new_coinbase(vec![2])]);
        assert!(store.put(fork_a.clone(), &NodeConfig::default()));
        assert!(store.put(fork_b.clone(), &NodeConfig::default()));
        assert_eq!(store.height_of(&fork_a.block_id()), Some(1));
        assert_eq!(store.height_of(&fork_b.block_id()), Some(1));
    }
}
