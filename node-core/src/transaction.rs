use rand::RngCore;
use shared::Hash256;

/// Tag byte mixed into the transaction-id preimage so a coinbase and a
/// regular transaction can never collide on txid even if the rest of
/// their fields happen to match.
const COINBASE_TAG: u8 = 0x00;
const REGULAR_TAG: u8 = 0x01;

/// Length, in bytes, of a coinbase's placeholder signature. It carries no
/// cryptographic meaning — a coinbase has no input to prove ownership of —
/// but is sized like a real signature so coinbase and regular
/// transactions serialize the same shape.
const COINBASE_SIGNATURE_LEN: usize = 64;

/// A single movement of one indivisible coin.
///
/// Every transaction has exactly one output and at most one input: `None`
/// marks a coinbase, the only way new coins enter circulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Recipient's public key — this transaction's sole output.
    pub output: Vec<u8>,
    /// The txid of the UTXO being spent, or `None` for a coinbase.
    pub input: Option<Hash256>,
    /// Proof of the right to spend `input`, or 64 random bytes for a
    /// coinbase.
    pub signature: Vec<u8>,
}

impl Transaction {
    #[must_use]
    pub fn new(output: Vec<u8>, input: Hash256, signature: Vec<u8>) -> Self {
        Self {
            output,
            input: Some(input),
            signature,
        }
    }

    /// Builds a coinbase transaction minting one coin to `recipient`.
    #[must_use]
    pub fn new_coinbase(recipient: Vec<u8>) -> Self {
        let mut signature = vec![0u8; COINBASE_SIGNATURE_LEN];
        rand::thread_rng().fill_bytes(&mut signature);
        Self {
            output: recipient,
            input: None,
            signature,
        }
    }

    #[must_use]
    pub const fn is_coinbase(&self) -> bool {
        self.input.is_none()
    }

    /// The message a spender signs to authorize moving `input`'s coin to
    /// `output`. Shared by signing and verification so both sides agree
    /// on what was actually promised.
    #[must_use]
    pub fn signing_message(output: &[u8], input: Hash256) -> Vec<u8> {
        let mut message = Vec::with_capacity(32 + output.len());
        message.extend_from_slice(input.as_bytes());
        message.extend_from_slice(output);
        message
    }

    /// Verifies this transaction's signature against the public key that
    /// owns the output being spent. Always `false` for a coinbase.
    #[must_use]
    pub fn verify_signature(&self, owner_public_key: &[u8]) -> bool {
        let Some(input) = self.input else {
            return false;
        };
        let message = Self::signing_message(&self.output, input);
        shared::verify(&message, &self.signature, owner_public_key)
    }

    /// The transaction id: `keccak256(tag ‖ input? ‖ output ‖ signature)`.
    /// Recomputed on demand rather than cached, same as everything else
    /// that derives its identity from content.
    #[must_use]
    pub fn txid(&self) -> Hash256 {
        let mut preimage =
            Vec::with_capacity(1 + 32 + self.output.len() + self.signature.len());
        preimage.push(if self.is_coinbase() {
            COINBASE_TAG
        } else {
            REGULAR_TAG
        });
        if let Some(input) = &self.input {
            preimage.extend_from_slice(input.as_bytes());
        }
        preimage.extend_from_slice(&self.output);
        preimage.extend_from_slice(&self.signature);
        Hash256::keccak256(&preimage)
    }
}
