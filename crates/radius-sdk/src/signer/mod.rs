//! Pluggable transaction and message signers
//!
//! [`Signer`] is the capability every signing backend provides. The SDK ships
//! [`PrivateKeySigner`] (local key) and [`ClefSigner`] (external signing
//! service); any other type implementing the trait works the same way.

mod clef;
mod private_key;

pub use clef::ClefSigner;
pub use private_key::PrivateKeySigner;

use async_trait::async_trait;
use radius_primitives::{Address, H256};
use radius_types::{SignedTransaction, Transaction};
use reqwest_middleware::ClientWithMiddleware;

use crate::SdkError;

/// Signing capability
#[async_trait]
pub trait Signer: Send + Sync {
    /// Address whose key signs
    fn address(&self) -> Address;

    /// Chain ID bound into transaction signatures (0 means pre-EIP-155)
    fn chain_id(&self) -> u64;

    /// Digest signed for `tx`
    fn hash(&self, tx: &Transaction) -> H256 {
        tx.signing_hash(self.chain_id())
    }

    /// Sign an EIP-191 personal message; returns 65 bytes `r || s || v`
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SdkError>;

    /// Sign a transaction
    async fn sign_transaction(&self, tx: &Transaction) -> Result<SignedTransaction, SdkError>;
}

/// What a signer needs from a client while bootstrapping
#[async_trait]
pub trait SignerClient: Send + Sync {
    /// Chain ID of the connected network
    async fn chain_id(&self) -> Result<u64, SdkError>;

    /// HTTP client, shared so signers reuse the client's connection pool
    fn http_client(&self) -> ClientWithMiddleware;
}

/// Fetch the chain ID, falling back to 0 when the lookup fails.
pub(crate) async fn resolve_chain_id(client: &dyn SignerClient) -> u64 {
    match client.chain_id().await {
        Ok(chain_id) => chain_id,
        Err(e) => {
            tracing::warn!(error = %e, "chain id lookup failed, signing with chain id 0");
            0
        }
    }
}

/// Transaction `v` for a recovery id: EIP-155 when `chain_id != 0`
pub(crate) fn transaction_v(recovery_id: u8, chain_id: u64) -> Result<u64, SdkError> {
    if chain_id == 0 {
        return Ok(27 + u64::from(recovery_id));
    }
    chain_id
        .checked_mul(2)
        .and_then(|v| v.checked_add(35 + u64::from(recovery_id)))
        .ok_or_else(|| SdkError::Signing(format!("chain id {} too large", chain_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_v() {
        assert_eq!(transaction_v(0, 0).unwrap(), 27);
        assert_eq!(transaction_v(1, 0).unwrap(), 28);
        assert_eq!(transaction_v(0, 1).unwrap(), 37);
        assert_eq!(transaction_v(1, 1).unwrap(), 38);
        assert_eq!(transaction_v(1, 1223).unwrap(), 1223 * 2 + 36);
        assert!(transaction_v(0, u64::MAX).is_err());
    }
}
