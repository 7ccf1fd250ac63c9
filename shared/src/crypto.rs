//! Digest & signature facade.
//!
//! `node-core` treats this module as an external collaborator: a keypair
//! generator, a deterministic signer, and a signature verifier over opaque
//! byte strings. Transactions carry signatures as raw bytes (not a
//! `Signature` type wrapping its own public key) because a coinbase
//! transaction's "signature" is just 64 random bytes, not a real ML-DSA
//! signature — the facade has to accept that without complaint.

use crate::{Result, SharedError};
use pqcrypto_dilithium::dilithium5;
use pqcrypto_traits::sign::{
    DetachedSignature as _, PublicKey as PQCPublicKeyTrait, SecretKey as PQCSecretKeyTrait,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Signature algorithms the facade can produce. Only one today; kept as an
/// enum (rather than a bare constant) so a future algorithm migration
/// doesn't need to touch every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    MLDSA65,
}

/// A public key, opaque outside this module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for PublicKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// A private key. Zeroized on drop.
#[derive(Debug, Clone)]
pub struct PrivateKey(Vec<u8>);

impl PrivateKey {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn to_pqc(&self) -> Result<dilithium5::SecretKey> {
        dilithium5::SecretKey::from_bytes(&self.0)
            .map_err(|_| SharedError::InvalidKeyMaterial)
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// A keypair, generated fresh for each node at construction time.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

impl KeyPair {
    /// Generates a new ML-DSA-65 keypair.
    ///
    /// # Errors
    /// Returns an error if the underlying key generation fails.
    pub fn generate() -> Result<Self> {
        let (public_key_bytes, secret_key_bytes) = dilithium5::keypair();
        Ok(Self {
            public_key: PublicKey(public_key_bytes.as_bytes().to_vec()),
            private_key: PrivateKey(secret_key_bytes.as_bytes().to_vec()),
        })
    }

    /// Signs an arbitrary message, returning a detached signature's raw
    /// bytes (independent of the message, unlike a signed-message
    /// container).
    ///
    /// # Errors
    /// Returns an error if the private key material is malformed.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let secret_key = self.private_key.to_pqc()?;
        let signature = dilithium5::detached_sign(message, &secret_key);
        Ok(signature.as_bytes().to_vec())
    }
}

/// Verifies a detached signature against a message and a raw public key.
///
/// Never raises: malformed public keys or signatures simply fail to
/// verify, the same as a genuine mismatch. This matters because one of the
/// two signature shapes `node-core` feeds in here (a coinbase's random
/// 64-byte payload) is never a real ML-DSA signature.
#[must_use]
pub fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    let Ok(public_key) = dilithium5::PublicKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = dilithium5::DetachedSignature::from_bytes(signature) else {
        return false;
    };
    dilithium5::verify_detached_signature(&signature, message, &public_key).is_ok()
}
