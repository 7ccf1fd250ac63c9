use node_core::{Block, BlockStore, NodeConfig, NodeError, Transaction};

fn node() -> node_core::Node {
    node_core::Node::new(NodeConfig::new(10)).unwrap()
}

#[test]
fn solo_coinage() {
    let alice = node();
    assert_eq!(alice.get_balance(), 0);

    alice.mine_block().unwrap();

    assert_eq!(alice.get_balance(), 1);
    assert_eq!(alice.get_utxo().len(), 1);
}

#[test]
fn transfer_between_connected_nodes() {
    let alice = node();
    let bob = node();
    alice.connect(&bob).unwrap();

    alice.mine_block().unwrap();
    assert_eq!(alice.get_balance(), 1);
    assert_eq!(bob.get_balance(), 0);

    // create_transaction submits and propagates on its own.
    alice.create_transaction(bob.get_address()).unwrap();
    // Propagated by gossip; Bob should see it pending too.
    assert_eq!(bob.get_mempool().len(), 1);

    alice.mine_block().unwrap();

    assert_eq!(alice.get_balance(), 1, "coinbase reward from the second block");
    assert_eq!(bob.get_balance(), 1, "received the transferred coin");
}

#[test]
fn mempool_rejects_conflicting_double_spend() {
    let alice = node();
    let bob = node();
    let carol = node();
    alice.connect(&bob).unwrap();
    alice.connect(&carol).unwrap();

    alice.mine_block().unwrap();

    // create_transaction submits and propagates on its own.
    let tx_to_bob = alice.create_transaction(bob.get_address()).unwrap();

    // Same input, different recipient: must be rejected everywhere it's
    // already pending, since that input is already claimed.
    let conflicting = Transaction::new(carol.get_address(), tx_to_bob.input.unwrap(), vec![0u8; 64]);
    assert!(!alice.add_transaction_to_mempool(conflicting.clone()));
    assert!(!bob.add_transaction_to_mempool(conflicting));
}

#[test]
fn fork_and_reorg_converges_all_peers_on_the_taller_chain() {
    let alice = node();
    let bob = node();
    alice.connect(&bob).unwrap();

    // Alice and Bob disagree for a moment: both mine a competing block on
    // top of genesis before either learns of the other's.
    alice.disconnect_from(&bob);
    let alice_block = alice.mine_block().unwrap();
    let bob_block = bob.mine_block().unwrap();
    assert_ne!(alice_block, bob_block);
    assert_eq!(alice.get_latest_hash(), alice_block);
    assert_eq!(bob.get_latest_hash(), bob_block);

    // Bob extends his own fork one block further, then reconnects and
    // announces. Alice must reorg onto Bob's now-taller chain.
    alice.connect(&bob).unwrap();
    bob.mine_block().unwrap();

    assert_eq!(alice.get_latest_hash(), bob.get_latest_hash());
    assert_eq!(alice.get_block(&bob.get_latest_hash()).unwrap(), bob.get_block(&bob.get_latest_hash()).unwrap());
}

#[test]
fn equal_height_fork_does_not_dislodge_the_incumbent_tip() {
    let alice = node();
    let bob = node();

    let alice_block = alice.mine_block().unwrap();
    let bob_block = bob.mine_block().unwrap();
    assert_ne!(alice_block, bob_block);

    // Connecting exchanges both tips; each node now knows both
    // height-1 forks but must stay on its own.
    alice.connect(&bob).unwrap();

    assert_eq!(alice.get_latest_hash(), alice_block);
    assert_eq!(bob.get_latest_hash(), bob_block);
}

#[test]
fn gossip_never_adopts_a_block_that_fails_validation() {
    let mut store = BlockStore::new();

    // Two coinbases in one block: violates "exactly one coinbase".
    let invalid = Block::new(
        node_core::GENESIS_PREV,
        vec![
            Transaction::new_coinbase(vec![1]),
            Transaction::new_coinbase(vec![2]),
        ],
    );

    assert!(!store.put(invalid.clone(), &NodeConfig::default()));
    assert!(store.get(&invalid.block_id()).is_none());
    assert_eq!(store.height_of(&node_core::GENESIS_PREV), Some(0));
}

#[test]
fn create_transaction_without_funds_reports_no_spendable_output() {
    let alice = node();
    let err = alice.create_transaction(vec![1, 2, 3]).unwrap_err();
    assert_eq!(err, NodeError::NoSpendableOutput);
}
