//! Hex quantity and data helpers for JSON-RPC values

use bytes::Bytes;
use radius_primitives::U256;
use serde::{de, Deserialize, Deserializer};

use crate::SdkError;

pub(crate) fn parse_u64(s: &str) -> Result<u64, SdkError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(s, 16).map_err(|e| SdkError::InvalidHex(e.to_string()))
}

pub(crate) fn parse_u256(s: &str) -> Result<U256, SdkError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(s, 16).map_err(|e| SdkError::InvalidHex(e.to_string()))
}

pub(crate) fn parse_bytes(s: &str) -> Result<Bytes, SdkError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() {
        return Ok(Bytes::new());
    }
    Ok(Bytes::from(hex::decode(s)?))
}

pub(crate) fn encode_u64(value: u64) -> String {
    format!("0x{:x}", value)
}

pub(crate) fn encode_u256(value: &U256) -> String {
    format!("0x{:x}", value)
}

pub(crate) fn encode_bytes(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

pub(crate) fn deserialize_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let s = String::deserialize(d)?;
    parse_u64(&s).map_err(de::Error::custom)
}

pub(crate) fn deserialize_opt_u64<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<u64>, D::Error> {
    match Option::<String>::deserialize(d)? {
        Some(s) => parse_u64(&s).map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}

pub(crate) fn deserialize_bytes<'de, D: Deserializer<'de>>(d: D) -> Result<Bytes, D::Error> {
    let s = Option::<String>::deserialize(d)?.unwrap_or_default();
    parse_bytes(&s).map_err(de::Error::custom)
}
