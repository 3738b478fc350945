//! Contract ABI wrapper over `ethabi`
//!
//! ```rust
//! use radius_sdk::abi::{Abi, Token};
//!
//! let abi = Abi::from_json(r#"[{"type":"function","name":"set","inputs":[{"name":"x","type":"uint256"}],"outputs":[],"stateMutability":"nonpayable"}]"#).unwrap();
//! let data = abi.pack("set", &[Token::Uint(42u64.into())]).unwrap();
//! assert_eq!(&data[..4], &[0x60, 0xfe, 0x47, 0xb1]);
//! ```

use std::collections::BTreeMap;

use bytes::Bytes;
use radius_primitives::Address;
use radius_types::Log;

use crate::receipt::Event;
use crate::SdkError;

pub use ethabi::{ParamType, Token};

/// Parsed contract ABI. Immutable; share it with `Arc<Abi>`.
#[derive(Debug, Clone)]
pub struct Abi {
    inner: ethabi::Contract,
}

impl Abi {
    /// Parse ABI JSON
    pub fn from_json(json: &str) -> Result<Self, SdkError> {
        if json.trim().is_empty() {
            return Err(SdkError::InvalidArgument("ABI JSON is empty".to_string()));
        }
        let inner = ethabi::Contract::load(json.as_bytes())
            .map_err(|e| SdkError::InvalidArgument(format!("invalid ABI JSON: {}", e)))?;
        Ok(Self { inner })
    }

    /// Best-effort parse: `None` instead of an error for invalid input.
    pub fn parse(json: &str) -> Option<Self> {
        Self::from_json(json).ok()
    }

    /// Underlying `ethabi` contract
    pub fn contract(&self) -> &ethabi::Contract {
        &self.inner
    }

    /// Check whether a function with this name exists
    pub fn has_function(&self, name: &str) -> bool {
        self.inner.function(name).is_ok()
    }

    /// Encode a call: 4-byte selector followed by the encoded arguments
    pub fn pack(&self, method: &str, args: &[Token]) -> Result<Vec<u8>, SdkError> {
        let function = self.inner.function(method)?;
        Ok(function.encode_input(args)?)
    }

    /// Append encoded constructor arguments to contract bytecode
    pub fn pack_constructor(&self, bytecode: &[u8], args: &[Token]) -> Result<Vec<u8>, SdkError> {
        match self.inner.constructor() {
            Some(constructor) => Ok(constructor.encode_input(bytecode.to_vec(), args)?),
            None if args.is_empty() => Ok(bytecode.to_vec()),
            None => Err(SdkError::InvalidArgument(format!(
                "ABI has no constructor but {} argument(s) were given",
                args.len()
            ))),
        }
    }

    /// Decode the return data of `method`
    pub fn unpack(&self, method: &str, data: &[u8]) -> Result<Vec<Token>, SdkError> {
        let function = self.inner.function(method)?;
        Ok(function.decode_output(data)?)
    }

    /// Decode a log against the events of this ABI; `None` if no event matches
    pub fn decode_log(&self, log: &Log) -> Option<Event> {
        let topic0 = log.topic0()?;
        let event = self
            .inner
            .events()
            .find(|e| !e.anonymous && e.signature().as_bytes() == topic0.as_bytes())?;

        let raw = ethabi::RawLog {
            topics: log
                .topics
                .iter()
                .map(|t| ethabi::Hash::from(*t.as_bytes()))
                .collect(),
            data: log.data.to_vec(),
        };
        let parsed = event.parse_log(raw).ok()?;
        let data: BTreeMap<String, Token> = parsed
            .params
            .into_iter()
            .map(|param| (param.name, param.value))
            .collect();

        Some(Event {
            name: event.name.clone(),
            data,
            raw: log.data.clone(),
        })
    }
}

/// ABI token for an address
pub fn address_token(address: &Address) -> Token {
    Token::Address(ethabi::Address::from(*address.as_bytes()))
}

/// Address held by a token, if it is an address token
pub fn token_to_address(token: &Token) -> Option<Address> {
    match token {
        Token::Address(a) => Some(Address::from_bytes(a.0)),
        _ => None,
    }
}

/// Best-effort hex decode of contract bytecode (optional 0x prefix)
pub fn bytecode_from_hex(hex_str: &str) -> Option<Bytes> {
    let trimmed = hex_str.trim();
    let s = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if s.is_empty() {
        return None;
    }
    hex::decode(s).ok().map(Bytes::from)
}
