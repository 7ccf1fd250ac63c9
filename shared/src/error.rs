use thiserror::Error;

/// Errors raised by the hashing and signature facade.
#[derive(Error, Debug)]
pub enum SharedError {
    #[error("invalid key material")]
    InvalidKeyMaterial,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("cryptographic operation failed: {0}")]
    CryptographicError(String),
}
