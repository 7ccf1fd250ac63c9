pub mod crypto;
pub mod error;
pub mod hash;

pub use crypto::{verify, KeyPair, PrivateKey, PublicKey, SignatureAlgorithm};
pub use error::SharedError;
pub use hash::Hash256;

pub type Result<T> = std::result::Result<T, SharedError>;
