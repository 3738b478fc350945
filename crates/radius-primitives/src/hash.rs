//! 256-bit hash type

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Hash parsing error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid hash length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Required byte length
        expected: usize,
        /// Actual byte length
        got: usize,
    },
}

/// 256-bit hash (32 bytes)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct H256([u8; 32]);

/// Alias for H256
pub type Hash = H256;

impl H256 {
    /// Size in bytes
    pub const LEN: usize = 32;

    /// Zero hash
    pub const ZERO: H256 = H256([0u8; 32]);

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, HashError> {
        if slice.len() != Self::LEN {
            return Err(HashError::InvalidLength {
                expected: Self::LEN,
                got: slice.len(),
            });
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(H256(bytes))
    }

    /// Parse from hex string, with or without the 0x prefix
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| HashError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Lowercase hex with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", self.to_hex_unprefixed())
    }

    /// Lowercase hex without prefix
    pub fn to_hex_unprefixed(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self.to_hex())
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for H256 {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for H256 {
    fn from(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }
}

impl AsRef<[u8]> for H256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for H256 {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de> Deserialize<'de> for H256 {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            H256::from_hex(&s).map_err(de::Error::custom)
        }
    }
}

// RLP implementations (behind feature flag)
#[cfg(feature = "rlp")]
mod rlp_impl {
    use super::*;
    use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

    impl Encodable for H256 {
        fn rlp_append(&self, s: &mut RlpStream) {
            s.encoder().encode_value(&self.0);
        }
    }

    impl Decodable for H256 {
        fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
            rlp.decoder().decode_value(|bytes| {
                H256::from_slice(bytes).map_err(|_| DecoderError::RlpInvalidLength)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

    #[test]
    fn test_h256_from_hex_with_and_without_prefix() {
        let a = H256::from_hex(SAMPLE).unwrap();
        let b = H256::from_hex(&SAMPLE[2..]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), SAMPLE);
        assert_eq!(a.to_hex_unprefixed(), &SAMPLE[2..]);
    }

    #[test]
    fn test_h256_uppercase_input() {
        let upper = SAMPLE.to_uppercase().replacen("0X", "0x", 1);
        assert_eq!(H256::from_hex(&upper).unwrap().to_hex(), SAMPLE);
    }

    #[test]
    fn test_h256_invalid_length() {
        let err = H256::from_hex("0xdeadbeef").unwrap_err();
        assert_eq!(
            err,
            HashError::InvalidLength {
                expected: 32,
                got: 4
            }
        );
    }

    #[test]
    fn test_h256_invalid_hex() {
        assert!(matches!(
            H256::from_hex("0xzz"),
            Err(HashError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_h256_zero() {
        assert!(H256::ZERO.is_zero());
        assert!(!H256::from_hex(SAMPLE).unwrap().is_zero());
    }

    #[test]
    fn test_h256_display_and_parse() {
        let h: H256 = SAMPLE.parse().unwrap();
        assert_eq!(h.to_string(), SAMPLE);
        assert_eq!(format!("{:?}", h), format!("H256({})", SAMPLE));
    }
}
