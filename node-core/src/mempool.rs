use crate::transaction::Transaction;
use crate::utxo::UtxoSnapshot;
use shared::Hash256;
use std::collections::HashSet;

/// Transactions awaiting inclusion in a block.
///
/// Ordering matters — `transactions()` returns admission order, and
/// `Node::mine_block` takes a prefix of it — so the backing store is a
/// `Vec`, with a `HashSet` of already-spent inputs kept alongside purely
/// as a fast duplicate-spend check.
#[derive(Debug, Clone, Default)]
pub struct Mempool {
    transactions: Vec<Transaction>,
    spent_inputs: HashSet<Hash256>,
}

impl Mempool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Attempts to admit `tx` against `tip`, the UTXO snapshot at the
    /// current best chain. Returns whether it was admitted.
    ///
    /// Rejects: coinbases, transactions already present, transactions
    /// whose input is already claimed by another pending transaction,
    /// transactions whose input doesn't exist at `tip`, and transactions
    /// whose signature doesn't match the input's owner.
    pub fn admit(&mut self, tx: Transaction, tip: &UtxoSnapshot) -> bool {
        let Some(input) = tx.input else {
            return false;
        };
        if self.spent_inputs.contains(&input) {
            return false;
        }
        let txid = tx.txid();
        if self.transactions.iter().any(|existing| existing.txid() == txid) {
            return false;
        }
        let Some(spent_tx) = tip.get(&input) else {
            return false;
        };
        if !tx.verify_signature(&spent_tx.output) {
            return false;
        }
        self.spent_inputs.insert(input);
        self.transactions.push(tx);
        true
    }

    /// Rebuilds admission from scratch against a new tip — used after a
    /// reorg, when some pending transactions may no longer spend an
    /// existing output, and others that were previously rejected might
    /// now be admissible.
    pub fn reconcile(&mut self, tip: &UtxoSnapshot) {
        let pending = std::mem::take(&mut self.transactions);
        self.spent_inputs.clear();
        for tx in pending {
            self.admit(tx, tip);
        }
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
        self.spent_inputs.clear();
    }

    /// Drops transactions that were just included in a mined block.
    pub fn remove_mined(&mut self, included: &[Transaction]) {
        self.transactions.retain(|tx| !included.contains(tx));
        self.spent_inputs = self
            .transactions
            .iter()
            .filter_map(|tx| tx.input)
            .collect();
    }
}
