use crate::block::{Block, GENESIS_PREV};
use crate::chain::select_tip;
use crate::config::NodeConfig;
use crate::error::{NodeError, NodeResult};
use crate::mempool::Mempool;
use crate::store::BlockStore;
use crate::transaction::Transaction;
use shared::{Hash256, KeyPair};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};

struct NodeState {
    keypair: KeyPair,
    config: NodeConfig,
    store: BlockStore,
    mempool: Mempool,
    tip: Hash256,
    tip_height: u64,
    peers: Vec<Weak<RefCell<NodeState>>>,
}

/// A participant in the network: keeps its own view of the chain, its own
/// mempool, and a set of peers it gossips with.
///
/// Peers hold each other via `Weak` references through `Rc<RefCell<_>>` —
/// a `connect`ed pair of nodes would otherwise form a reference cycle
/// neither side could ever drop. `Node` itself is a thin, `Clone`-able
/// handle around the shared state, the same shape a peer's upgraded
/// `Weak` resolves to.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeState>>);

impl Node {
    /// Creates a fresh node with its own keypair and an empty store — its
    /// tip starts at `GENESIS_PREV`, the sentinel parent of the first
    /// real block on any chain.
    ///
    /// # Errors
    /// Returns an error if keypair generation fails.
    pub fn new(config: NodeConfig) -> NodeResult<Self> {
        let keypair = KeyPair::generate()?;
        let state = NodeState {
            keypair,
            config,
            store: BlockStore::new(),
            mempool: Mempool::new(),
            tip: GENESIS_PREV,
            tip_height: 0,
            peers: Vec::new(),
        };
        Ok(Self(Rc::new(RefCell::new(state))))
    }

    #[must_use]
    pub fn get_address(&self) -> Vec<u8> {
        self.0.borrow().keypair.public_key.as_bytes().to_vec()
    }

    #[must_use]
    pub fn get_latest_hash(&self) -> Hash256 {
        self.0.borrow().tip
    }

    /// # Errors
    /// Returns [`NodeError::UnknownBlock`] if this node has never stored
    /// `id`.
    pub fn get_block(&self, id: &Hash256) -> NodeResult<Block> {
        self.0
            .borrow()
            .store
            .get(id)
            .cloned()
            .ok_or(NodeError::UnknownBlock(*id))
    }

    #[must_use]
    pub fn get_mempool(&self) -> Vec<Transaction> {
        self.0.borrow().mempool.transactions().to_vec()
    }

    /// The unspent outputs at this node's current tip.
    #[must_use]
    pub fn get_utxo(&self) -> Vec<Transaction> {
        let state = self.0.borrow();
        let snapshot = state
            .store
            .snapshot_of(&state.tip)
            .expect("tip is always present in the store");
        snapshot.iter().map(|(_, tx)| tx.clone()).collect()
    }

    /// Number of coins owned by this node's own public key at the current
    /// tip.
    #[must_use]
    pub fn get_balance(&self) -> u64 {
        let state = self.0.borrow();
        let snapshot = state
            .store
            .snapshot_of(&state.tip)
            .expect("tip is always present in the store");
        let my_key = state.keypair.public_key.as_bytes();
        snapshot
            .iter()
            .filter(|(_, tx)| tx.output.as_slice() == my_key)
            .count() as u64
    }

    /// Connects this node to `other`, symmetrically, and exchanges tip
    /// announcements in both directions so each learns the other's chain.
    ///
    /// # Errors
    /// Returns [`NodeError::SelfConnect`] if `other` is this same node.
    pub fn connect(&self, other: &Node) -> NodeResult<()> {
        if Rc::ptr_eq(&self.0, &other.0) {
            return Err(NodeError::SelfConnect);
        }
        {
            let mut state = self.0.borrow_mut();
            if !state.peers.iter().any(|weak| weak_points_to(weak, &other.0)) {
                state.peers.push(Rc::downgrade(&other.0));
            }
        }
        {
            let mut state = other.0.borrow_mut();
            if !state.peers.iter().any(|weak| weak_points_to(weak, &self.0)) {
                state.peers.push(Rc::downgrade(&self.0));
            }
        }

        let my_tip = self.get_latest_hash();
        let other_tip = other.get_latest_hash();
        other.notify_of_block(my_tip, self)?;
        self.notify_of_block(other_tip, other)?;
        Ok(())
    }

    pub fn disconnect_from(&self, other: &Node) {
        self.0
            .borrow_mut()
            .peers
            .retain(|weak| !weak_points_to(weak, &other.0));
        other
            .0
            .borrow_mut()
            .peers
            .retain(|weak| !weak_points_to(weak, &self.0));
    }

    /// A defensive copy of this node's current connections.
    #[must_use]
    pub fn get_connections(&self) -> Vec<Node> {
        self.0
            .borrow()
            .peers
            .iter()
            .filter_map(|weak| weak.upgrade().map(Node))
            .collect()
    }

    /// Attempts to admit `tx` to the mempool against the current tip. If
    /// admitted for the first time, propagates it to every peer; peers
    /// that already have it reject it as a duplicate, which is what
    /// stops the flood from running forever.
    pub fn add_transaction_to_mempool(&self, tx: Transaction) -> bool {
        let (admitted, peers) = {
            let mut state = self.0.borrow_mut();
            let tip_snapshot = state
                .store
                .snapshot_of(&state.tip)
                .expect("tip is always present in the store");
            let admitted = state.mempool.admit(tx.clone(), &tip_snapshot);
            (admitted, state.peers.clone())
        };
        if admitted {
            debug!(txid = %tx.txid(), "admitted transaction to mempool, propagating");
            for peer in peers.into_iter().filter_map(|weak| weak.upgrade()) {
                Node(peer).add_transaction_to_mempool(tx.clone());
            }
        }
        admitted
    }

    /// Handles an announcement that `announcer` has a block with id
    /// `block_id`. If it's new, pulls every missing ancestor from
    /// `announcer` one at a time, verifying each fetched block really
    /// hashes to the id it was fetched under, then stores the whole
    /// chain oldest-first, re-selects the tip, and — if the tip actually
    /// changed — re-broadcasts to every peer except `announcer`.
    ///
    /// # Errors
    /// Returns [`NodeError::UnknownBlock`] if `announcer` claims to have
    /// a block it cannot actually produce.
    pub fn notify_of_block(&self, block_id: Hash256, announcer: &Node) -> NodeResult<()> {
        if block_id == GENESIS_PREV || self.0.borrow().store.has(&block_id) {
            return Ok(());
        }

        let mut pending = Vec::new();
        let mut cursor = block_id;
        loop {
            let Ok(block) = announcer.get_block(&cursor) else {
                warn!(
                    claimed = %cursor,
                    "announcer could not produce a block it claimed to have; abandoning pull-walk"
                );
                return Ok(());
            };
            let recomputed = block.block_id();
            if recomputed != cursor {
                warn!(
                    claimed = %cursor,
                    actual = %recomputed,
                    "announcer served a block that doesn't hash to its claimed id"
                );
                return Ok(());
            }
            let prev = block.prev_block_id;
            let already_known = prev == GENESIS_PREV || self.0.borrow().store.has(&prev);
            pending.push(block);
            if already_known {
                break;
            }
            cursor = prev;
        }

        let config = self.0.borrow().config;
        for block in pending.into_iter().rev() {
            self.0.borrow_mut().store.put(block, &config);
        }

        let (old_tip, old_height) = {
            let state = self.0.borrow();
            (state.tip, state.tip_height)
        };
        let (new_tip, new_height) = {
            let state = self.0.borrow();
            select_tip(&state.store, old_tip, old_height)
        };

        if new_tip != old_tip {
            let new_snapshot = self
                .0
                .borrow()
                .store
                .snapshot_of(&new_tip)
                .expect("selected tip is always stored");
            {
                let mut state = self.0.borrow_mut();
                state.tip = new_tip;
                state.tip_height = new_height;
                state.mempool.reconcile(&new_snapshot);
            }
            info!(old = %old_tip, new = %new_tip, height = new_height, "adopted new tip");
        }

        // Re-broadcast only when the node's tip is now exactly the block
        // that was announced — not merely "a tip changed" — matching the
        // spec's literal termination condition.
        if self.0.borrow().tip == block_id {
            let peers = self.0.borrow().peers.clone();
            for peer in peers.into_iter().filter_map(|weak| weak.upgrade()) {
                let peer = Node(peer);
                if !Rc::ptr_eq(&peer.0, &announcer.0) {
                    peer.notify_of_block(block_id, self)?;
                }
            }
        }

        Ok(())
    }

    /// Mines a block on top of the current tip: a coinbase crediting this
    /// node, plus as many pending mempool transactions as fit, submitted
    /// through the same validation path gossip-received blocks go
    /// through — there is no fast path for one's own blocks.
    ///
    /// # Errors
    /// Returns [`NodeError::Inconsistent`] if the store rejects a block
    /// built from this node's own, already-validated inputs — which
    /// would mean a bug elsewhere in the node, not a legitimate refusal.
    pub fn mine_block(&self) -> NodeResult<Hash256> {
        let (block, peers) = {
            let mut state = self.0.borrow_mut();
            let coinbase = Transaction::new_coinbase(state.keypair.public_key.as_bytes().to_vec());
            let capacity = state.config.block_size.saturating_sub(1);
            let included: Vec<Transaction> = state
                .mempool
                .transactions()
                .iter()
                .take(capacity)
                .cloned()
                .collect();

            let mut transactions = Vec::with_capacity(1 + included.len());
            transactions.push(coinbase);
            transactions.extend(included.iter().cloned());
            let block = Block::new(state.tip, transactions);

            let config = state.config;
            if !state.store.put(block.clone(), &config) {
                return Err(NodeError::Inconsistent(
                    "freshly mined block was rejected by the local store".to_string(),
                ));
            }
            state.mempool.remove_mined(&included);

            let (new_tip, new_height) = select_tip(&state.store, state.tip, state.tip_height);
            state.tip = new_tip;
            state.tip_height = new_height;
            let tip_snapshot = state
                .store
                .snapshot_of(&new_tip)
                .expect("selected tip is always stored");
            state.mempool.reconcile(&tip_snapshot);

            (block, state.peers.clone())
        };

        let block_id = block.block_id();
        for peer in peers.into_iter().filter_map(|weak| weak.upgrade()) {
            Node(peer).notify_of_block(block_id, self)?;
        }
        Ok(block_id)
    }

    /// Builds and signs a transaction moving this node's first spendable
    /// coin to `recipient`, then submits it through this node's own
    /// `add_transaction_to_mempool` — same path a peer's forwarded
    /// transaction takes — and returns it only if admission actually
    /// succeeded. "Spendable" excludes outputs this node's own mempool
    /// transactions already claim, so back-to-back calls don't try to
    /// spend the same coin twice.
    ///
    /// # Errors
    /// Returns [`NodeError::NoSpendableOutput`] if this node owns no
    /// unclaimed output at the current tip, or [`NodeError::NotAdmitted`]
    /// if the built transaction was built but the mempool refused it.
    pub fn create_transaction(&self, recipient: Vec<u8>) -> NodeResult<Transaction> {
        let tx = {
            let state = self.0.borrow();
            let tip_snapshot = state
                .store
                .snapshot_of(&state.tip)
                .expect("tip is always present in the store");
            let my_key = state.keypair.public_key.as_bytes();
            let already_claimed: HashSet<Hash256> = state
                .mempool
                .transactions()
                .iter()
                .filter_map(|tx| tx.input)
                .collect();

            let source = tip_snapshot
                .iter()
                .find(|(txid, tx)| {
                    tx.output.as_slice() == my_key && !already_claimed.contains(txid)
                })
                .map(|(txid, _)| *txid)
                .ok_or(NodeError::NoSpendableOutput)?;

            let message = Transaction::signing_message(&recipient, source);
            let signature = state.keypair.sign(&message)?;
            Transaction::new(recipient, source, signature)
        };

        if self.add_transaction_to_mempool(tx.clone()) {
            Ok(tx)
        } else {
            Err(NodeError::NotAdmitted)
        }
    }

    pub fn clear_mempool(&self) {
        self.0.borrow_mut().mempool.clear();
    }
}

fn weak_points_to(weak: &Weak<RefCell<NodeState>>, target: &Rc<RefCell<NodeState>>) -> bool {
    weak.upgrade().is_some_and(|rc| Rc::ptr_eq(&rc, target))
}
