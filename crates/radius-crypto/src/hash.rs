//! Keccak-256 and EIP-191 message hashing

use radius_primitives::H256;
use sha3::{Digest, Keccak256};

/// Prefix prepended to personal messages before hashing (EIP-191 version 0x45)
pub const MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_bytes(hasher.finalize().into())
}

/// Hash a personal message: `keccak256(prefix ++ decimal(len) ++ message)`.
pub fn hash_message(message: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    H256::from_bytes(hasher.finalize().into())
}
