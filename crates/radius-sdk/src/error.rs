//! SDK error types

use radius_primitives::H256;
use thiserror::Error;

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// Caller supplied an unusable argument; raised before any network call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transport/network error
    #[error("Network error: {0}")]
    Network(String),

    /// JSON-RPC error returned by the node or signer
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// The node rejected the signed transaction
    #[error("Broadcast failed: {0}")]
    Broadcast(String),

    /// Gas estimation failed
    #[error("Gas estimation failed: {0}")]
    Estimation(String),

    /// Signing backend failed or returned malformed data
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Receipt did not appear before the timeout
    #[error("Timed out waiting for receipt of transaction {tx_hash}")]
    ReceiptTimeout {
        /// Hash of the broadcast transaction
        tx_hash: H256,
    },

    /// Transaction was mined but reverted
    #[error("Transaction failed with status {status}, transaction hash {tx_hash}")]
    Transaction {
        /// Receipt status
        status: u64,
        /// Transaction hash
        tx_hash: H256,
    },

    /// Receipt carries no status field, so success cannot be determined
    #[error("Receipt for transaction {tx_hash} has no status field")]
    MissingStatus {
        /// Transaction hash
        tx_hash: H256,
    },

    /// A contract call or execution failed
    #[error("Contract method {method} failed: {source}")]
    ContractCall {
        /// Method name
        method: String,
        /// Underlying failure
        #[source]
        source: Box<SdkError>,
    },

    /// ABI parse, encode or decode error
    #[error("ABI error: {0}")]
    Abi(String),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Missing required field in a response
    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl SdkError {
    /// Wrap an error with the contract method it came from
    pub fn contract_call(method: &str, source: SdkError) -> Self {
        SdkError::ContractCall {
            method: method.to_string(),
            source: Box::new(source),
        }
    }

    /// Transaction hash carried by this error, if any
    pub fn tx_hash(&self) -> Option<H256> {
        match self {
            SdkError::ReceiptTimeout { tx_hash }
            | SdkError::MissingStatus { tx_hash }
            | SdkError::Transaction { tx_hash, .. } => Some(*tx_hash),
            SdkError::ContractCall { source, .. } => source.tx_hash(),
            _ => None,
        }
    }
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<ethabi::Error> for SdkError {
    fn from(e: ethabi::Error) -> Self {
        SdkError::Abi(e.to_string())
    }
}

impl From<radius_crypto::CryptoError> for SdkError {
    fn from(e: radius_crypto::CryptoError) -> Self {
        SdkError::Signing(e.to_string())
    }
}

impl From<radius_primitives::AddressError> for SdkError {
    fn from(e: radius_primitives::AddressError) -> Self {
        SdkError::InvalidArgument(e.to_string())
    }
}

impl From<radius_primitives::HashError> for SdkError {
    fn from(e: radius_primitives::HashError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<reqwest_middleware::Error> for SdkError {
    fn from(e: reqwest_middleware::Error) -> Self {
        SdkError::Network(e.to_string())
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        SdkError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_error_message() {
        let hash = H256::from_bytes([0xab; 32]);
        let err = SdkError::Transaction {
            status: 0,
            tx_hash: hash,
        };
        let msg = err.to_string();
        assert!(msg.contains("status 0"));
        assert!(msg.contains(&hash.to_hex()));
    }

    #[test]
    fn test_contract_call_keeps_hash() {
        let hash = H256::from_bytes([0x01; 32]);
        let err = SdkError::contract_call(
            "set",
            SdkError::Transaction {
                status: 0,
                tx_hash: hash,
            },
        );
        assert_eq!(err.tx_hash(), Some(hash));
        assert!(err.to_string().contains("set"));
    }
}
