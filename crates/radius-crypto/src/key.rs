//! Private key parsing and generation

use crate::{public_key_to_address, CryptoError, PrivateKey};
use radius_primitives::Address;
use rand::rngs::OsRng;
use zeroize::Zeroize;

/// Generate a new random private key
pub fn generate_private_key() -> PrivateKey {
    PrivateKey::random(&mut OsRng)
}

/// Parse a hex-encoded 32-byte private key, with or without "0x".
///
/// Intermediate buffers are zeroized on every path.
pub fn private_key_from_hex(hex: &str) -> Result<PrivateKey, CryptoError> {
    let hex = hex.trim();
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    let mut bytes =
        hex::decode(hex).map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
    if bytes.len() != 32 {
        let len = bytes.len();
        bytes.zeroize();
        return Err(CryptoError::InvalidPrivateKey(format!(
            "expected 32 bytes, got {}",
            len
        )));
    }

    let result =
        PrivateKey::from_slice(&bytes).map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()));
    bytes.zeroize();
    result
}

/// Address controlled by a private key
pub fn private_key_to_address(key: &PrivateKey) -> Address {
    public_key_to_address(key.verifying_key())
}
