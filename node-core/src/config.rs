/// Node-wide tunables.
///
/// This is the node's *in-memory* configuration surface, not a file- or
/// CLI-loaded one — nothing here reads from disk or the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConfig {
    /// Maximum number of transactions a block may carry, coinbase
    /// included. The validator rejects any block exceeding this.
    pub block_size: usize,
}

impl NodeConfig {
    #[must_use]
    pub const fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self { block_size: 10 }
    }
}
