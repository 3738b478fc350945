//! Error types for transaction encoding

use radius_crypto::CryptoError;
use thiserror::Error;

/// Transaction codec error
#[derive(Debug, Error)]
pub enum TypesError {
    /// RLP decoding failed
    #[error("rlp decode error: {0}")]
    Decode(#[from] rlp::DecoderError),

    /// Signature is malformed
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Sender could not be recovered
    #[error("sender recovery failed: {0}")]
    Recovery(#[from] CryptoError),
}
