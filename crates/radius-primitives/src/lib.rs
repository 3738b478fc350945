//! # radius-primitives
//!
//! Primitive types shared by the Radius SDK crates.
//!
//! - [`Address`]: 20-byte account identifier, EIP-55 checksummed on display
//! - [`H256`] / [`Hash`]: 32-byte digest
//! - [`U256`]: re-exported from `primitive-types`

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::{Hash, HashError, H256};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Transaction nonce type
pub type Nonce = u64;

/// Gas type
pub type Gas = u64;
