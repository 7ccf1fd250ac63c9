use crate::transaction::Transaction;
use shared::Hash256;
use std::collections::HashMap;
use std::rc::Rc;

/// The set of unspent outputs at some block, keyed by the txid that
/// created them.
///
/// Cloning is O(1): snapshots share their backing map via `Rc` until one
/// of them is mutated, at which point `apply` copies the map once
/// (`Rc::make_mut`) before writing to it. Good enough at the scale this
/// store operates at — see the design notes on why a persistent-map
/// crate isn't pulled in for this.
#[derive(Debug, Clone, Default)]
pub struct UtxoSnapshot(Rc<HashMap<Hash256, Transaction>>);

impl UtxoSnapshot {
    #[must_use]
    pub fn empty() -> Self {
        Self(Rc::new(HashMap::new()))
    }

    #[must_use]
    pub fn get(&self, txid: &Hash256) -> Option<&Transaction> {
        self.0.get(txid)
    }

    #[must_use]
    pub fn contains(&self, txid: &Hash256) -> bool {
        self.0.contains_key(txid)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Hash256, &Transaction)> {
        self.0.iter()
    }

    /// Applies an already-validated transaction set: each transaction's
    /// input (if any) is removed as spent and its own txid inserted as a
    /// fresh unspent output.
    #[must_use]
    pub fn apply(&self, transactions: &[Transaction]) -> Self {
        let mut next = self.clone();
        {
            let map = Rc::make_mut(&mut next.0);
            for tx in transactions {
                if let Some(input) = &tx.input {
                    map.remove(input);
                }
                map.insert(tx.txid(), tx.clone());
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_inserts_coinbase_output() {
        let snapshot = UtxoSnapshot::empty();
        let coinbase = Transaction::new_coinbase(vec![1, 2, 3]);
        let txid = coinbase.txid();
        let next = snapshot.apply(&[coinbase]);
        assert!(next.contains(&txid));
        assert!(snapshot.is_empty(), "prior snapshot must stay untouched");
    }

    #[test]
    fn apply_removes_spent_input_and_adds_new_output() {
        let coinbase = Transaction::new_coinbase(vec![1, 2, 3]);
        let coinbase_txid = coinbase.txid();
        let base = UtxoSnapshot::empty().apply(&[coinbase]);

        let spend = Transaction::new(vec![4, 5, 6], coinbase_txid, vec![0u8; 64]);
        let spend_txid = spend.txid();
        let next = base.apply(&[spend]);

        assert!(!next.contains(&coinbase_txid));
        assert!(next.contains(&spend_txid));
        assert!(base.contains(&coinbase_txid), "prior snapshot must stay untouched");
    }
}
