use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

/// 256-bit digest used to identify blocks and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    /// The all-zero sentinel. `node-core` uses this as `GENESIS_PREV` —
    /// distinguishable from any realizable `keccak256` output.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Computes the Keccak-256 digest of the provided data.
    #[must_use]
    pub fn keccak256(data: &[u8]) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(data);
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        Self(hash)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_displays_as_all_zero_hex() {
        let hash = Hash256::zero();
        assert_eq!(
            hash.to_string(),
            "0000000000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn keccak256_is_deterministic_and_nonzero() {
        let data = b"solidus";
        let a = Hash256::keccak256(data);
        let b = Hash256::keccak256(data);
        assert_eq!(a, b);
        assert_ne!(a, Hash256::zero());
    }

    #[test]
    fn distinct_inputs_hash_differently() {
        let a = Hash256::keccak256(b"alpha");
        let b = Hash256::keccak256(b"beta");
        assert_ne!(a, b);
    }
}
