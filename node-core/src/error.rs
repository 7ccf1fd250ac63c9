use shared::{Hash256, SharedError};
use std::fmt;

/// Errors surfaced by the node's public API.
///
/// Admission and validation failures are deliberately *not* represented
/// here: `Mempool::admit` and `BlockStore::put` report those as `bool`,
/// because a rejected transaction or an invalid block is an expected,
/// routine outcome in a gossip network, not an exceptional one. `NodeError`
/// is reserved for misuse of the API and for internal inconsistency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// `get_block` (or an internal lookup) was asked about a block id the
    /// store has never heard of.
    UnknownBlock(Hash256),
    /// A node tried to connect to itself.
    SelfConnect,
    /// The signature facade rejected key material or a signing request.
    CryptoError(String),
    /// An internal invariant was violated — e.g. a freshly mined block,
    /// built from the node's own mempool and UTXO snapshot, was rejected
    /// by the very store that produced those inputs.
    Inconsistent(String),
    /// `create_transaction` found no unspent output owned by this node.
    NoSpendableOutput,
    /// `create_transaction` built a transaction but the mempool refused to
    /// admit it — e.g. a reorg claimed the chosen output between selecting
    /// it and signing.
    NotAdmitted,
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::UnknownBlock(id) => write!(f, "unknown block: {id}"),
            NodeError::SelfConnect => write!(f, "a node cannot connect to itself"),
            NodeError::CryptoError(msg) => write!(f, "cryptographic error: {msg}"),
            NodeError::Inconsistent(msg) => write!(f, "internal inconsistency: {msg}"),
            NodeError::NoSpendableOutput => {
                write!(f, "no unspent output available to spend")
            }
            NodeError::NotAdmitted => {
                write!(f, "built transaction was not admitted to the mempool")
            }
        }
    }
}

impl std::error::Error for NodeError {}

impl From<SharedError> for NodeError {
    fn from(err: SharedError) -> Self {
        NodeError::CryptoError(err.to_string())
    }
}

pub type NodeResult<T> = std::result::Result<T, NodeError>;
