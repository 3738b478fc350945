//! Accounts: an address with an optional signer

use std::sync::Arc;

use radius_crypto::private_key_from_hex;
use radius_primitives::{Address, U256};
use radius_types::{SignedTransaction, Transaction};

use crate::receipt::Receipt;
use crate::signer::{PrivateKeySigner, Signer};
use crate::{Client, SdkError};

/// An account on the Radius network.
///
/// Without a signer the account is read-only and its address is the zero
/// address.
#[derive(Clone, Default)]
pub struct Account {
    signer: Option<Arc<dyn Signer>>,
}

impl Account {
    /// Account with no signer
    pub fn new() -> Self {
        Self::default()
    }

    /// Account backed by `signer`
    pub fn with_signer(signer: Arc<dyn Signer>) -> Self {
        Self {
            signer: Some(signer),
        }
    }

    /// Account for a hex private key; the chain ID comes from `client`
    pub async fn from_private_key_hex(hex: &str, client: &Client) -> Result<Self, SdkError> {
        let key = private_key_from_hex(hex).map_err(|e| SdkError::InvalidArgument(e.to_string()))?;
        let signer = PrivateKeySigner::connect(key, client).await;
        Ok(Self::with_signer(Arc::new(signer)))
    }

    /// Signer, if any
    pub fn signer(&self) -> Option<&Arc<dyn Signer>> {
        self.signer.as_ref()
    }

    /// Signer address, or zero when there is no signer
    pub fn address(&self) -> Address {
        self.signer
            .as_ref()
            .map(|s| s.address())
            .unwrap_or(Address::ZERO)
    }

    /// Balance in wei
    pub async fn balance(&self, client: &Client) -> Result<U256, SdkError> {
        client.balance_at(&self.address()).await
    }

    /// Pending nonce
    pub async fn nonce(&self, client: &Client) -> Result<u64, SdkError> {
        client.pending_nonce_at(&self.address()).await
    }

    /// Transfer `amount` wei to `recipient`
    pub async fn send(
        &self,
        client: &Client,
        recipient: &Address,
        amount: U256,
    ) -> Result<Receipt, SdkError> {
        let signer = self.require_signer("sending transactions")?;
        client.send(signer.as_ref(), recipient, amount).await
    }

    /// Sign an EIP-191 personal message
    pub async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SdkError> {
        let signer = self.require_signer("signing messages")?;
        signer.sign_message(message).await
    }

    /// Sign a prepared transaction
    pub async fn sign_transaction(&self, tx: &Transaction) -> Result<SignedTransaction, SdkError> {
        let signer = self.require_signer("signing transactions")?;
        signer.sign_transaction(tx).await
    }

    fn require_signer(&self, action: &str) -> Result<&Arc<dyn Signer>, SdkError> {
        self.signer
            .as_ref()
            .ok_or_else(|| SdkError::InvalidArgument(format!("signer is required for {}", action)))
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .field("has_signer", &self.signer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockTransport;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_without_signer() {
        let account = Account::new();
        assert_eq!(account.address(), Address::ZERO);

        let err = account.sign_message(b"hello").await.unwrap_err();
        assert!(matches!(err, SdkError::InvalidArgument(ref m) if m.contains("signing messages")));
        assert!(account
            .sign_transaction(&Transaction::default())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_send_without_signer_makes_no_request() {
        let mock = MockTransport::new();
        let client = Client::with_transport(mock.clone()).await.unwrap();

        let err = Account::new()
            .send(&client, &Address::from_bytes([1; 20]), U256::one())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::InvalidArgument(_)));
        assert_eq!(mock.requested_methods(), vec!["eth_chainId"]);
    }

    #[tokio::test]
    async fn test_from_private_key_hex() {
        let mock = MockTransport::new();
        mock.set_response("eth_getTransactionCount", serde_json::json!("0x3"));
        let client = Client::with_transport(mock.clone()).await.unwrap();

        let account = Account::from_private_key_hex(KEY, &client).await.unwrap();
        assert_eq!(
            account.address().to_hex(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert_eq!(account.signer().unwrap().chain_id(), 1);
        assert_eq!(account.nonce(&client).await.unwrap(), 3);

        let sig = account.sign_message(b"hello").await.unwrap();
        assert_eq!(sig.len(), 65);
    }

    #[tokio::test]
    async fn test_bad_private_key() {
        let client = Client::with_transport(MockTransport::new()).await.unwrap();
        assert!(matches!(
            Account::from_private_key_hex("0x1234", &client).await,
            Err(SdkError::InvalidArgument(_))
        ));
    }
}
