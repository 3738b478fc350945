//! # radius-crypto
//!
//! Cryptographic primitives for the Radius SDK.
//!
//! - Keccak-256 hashing and EIP-191 message hashing
//! - ECDSA signing/verification (secp256k1, low-s)
//! - Public key recovery
//! - Address derivation

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod key;
mod signature;

pub use error::CryptoError;
pub use hash::{hash_message, keccak256, MESSAGE_PREFIX};
pub use key::{generate_private_key, private_key_from_hex, private_key_to_address};
pub use signature::{
    public_key_to_address, recover_address, recover_public_key, sign, verify, PrivateKey,
    PublicKey, Signature,
};
