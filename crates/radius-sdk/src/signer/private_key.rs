//! Local private-key signer

use async_trait::async_trait;
use radius_crypto::{
    generate_private_key, hash_message, private_key_from_hex, private_key_to_address, sign,
    PrivateKey, PublicKey,
};
use radius_primitives::{Address, H256};
use radius_types::{SignedTransaction, Transaction, TxSignature};

use super::{resolve_chain_id, transaction_v, Signer, SignerClient};
use crate::SdkError;

/// Signs with a secp256k1 key held in memory
///
/// Clone is not implemented so the key is never duplicated by accident.
pub struct PrivateKeySigner {
    key: PrivateKey,
    address: Address,
    chain_id: u64,
}

impl PrivateKeySigner {
    /// Signer for `chain_id`
    pub fn new(key: PrivateKey, chain_id: u64) -> Self {
        let address = private_key_to_address(&key);
        Self {
            key,
            address,
            chain_id,
        }
    }

    /// Signer from a hex key (with or without "0x")
    pub fn from_hex(hex: &str, chain_id: u64) -> Result<Self, SdkError> {
        let key = private_key_from_hex(hex)?;
        Ok(Self::new(key, chain_id))
    }

    /// Signer with a freshly generated key
    pub fn random(chain_id: u64) -> Self {
        Self::new(generate_private_key(), chain_id)
    }

    /// Signer whose chain ID is fetched from `client`.
    ///
    /// A failed lookup is logged and leaves the chain ID at 0.
    pub async fn connect(key: PrivateKey, client: &dyn SignerClient) -> Self {
        let chain_id = resolve_chain_id(client).await;
        Self::new(key, chain_id)
    }

    /// Verifying key
    pub fn public_key(&self) -> &PublicKey {
        self.key.verifying_key()
    }

    /// Raw key bytes as a 0x-prefixed hex string
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.key.to_bytes()))
    }

    /// Check that `signed` was signed by this key for this signer's chain.
    ///
    /// A malformed `v` is an error; a valid signature from another key or
    /// for another chain is `Ok(false)`.
    pub fn verify_signature(&self, signed: &SignedTransaction) -> Result<bool, SdkError> {
        let signature = signed.signature();
        if signature.recovery_id().is_none() {
            return Err(SdkError::Signing(format!("invalid recovery id in v = {}", signature.v)));
        }
        if signature.chain_id() != self.chain_id {
            return Ok(false);
        }
        let sender = signed
            .recover_sender()
            .map_err(|e| SdkError::Signing(e.to_string()))?;
        Ok(sender == self.address)
    }
}

#[async_trait]
impl Signer for PrivateKeySigner {
    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SdkError> {
        let signature = sign(&hash_message(message), &self.key)?;
        Ok(signature.to_bytes().to_vec())
    }

    async fn sign_transaction(&self, tx: &Transaction) -> Result<SignedTransaction, SdkError> {
        let signature = sign(&self.hash(tx), &self.key)?;
        let v = transaction_v(signature.recovery_id(), self.chain_id)?;
        Ok(SignedTransaction::new(
            tx.clone(),
            TxSignature::new(v, H256::from_bytes(signature.r), H256::from_bytes(signature.s)),
        ))
    }
}

impl std::fmt::Debug for PrivateKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeySigner")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radius_crypto::{recover_address, Signature};

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_from_hex_address() {
        let signer = PrivateKeySigner::from_hex(TEST_KEY, 1).unwrap();
        assert_eq!(
            signer.address().to_hex(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert_eq!(signer.chain_id(), 1);
    }

    #[test]
    fn test_debug_hides_key() {
        let signer = PrivateKeySigner::from_hex(TEST_KEY, 1).unwrap();
        let debug = format!("{:?}", signer);
        assert!(!debug.contains("ac0974bec39a17e3"));
        assert!(debug.contains("PrivateKeySigner"));
    }

    #[test]
    fn test_private_key_hex_round_trip() {
        let signer = PrivateKeySigner::from_hex(TEST_KEY, 1).unwrap();
        assert_eq!(signer.private_key_hex(), TEST_KEY);
    }

    #[tokio::test]
    async fn test_sign_message_recovers() {
        let signer = PrivateKeySigner::from_hex(TEST_KEY, 1).unwrap();
        let sig = signer.sign_message(b"hello world").await.unwrap();
        assert_eq!(sig.len(), 65);
        assert!(sig[64] == 27 || sig[64] == 28);

        let mut bytes = [0u8; 65];
        bytes.copy_from_slice(&sig);
        let recovered =
            recover_address(&hash_message(b"hello world"), &Signature::from_bytes(&bytes)).unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[tokio::test]
    async fn test_verify_signature() {
        let signer = PrivateKeySigner::from_hex(TEST_KEY, 1223).unwrap();
        let tx = Transaction {
            to: Some(Address::from_bytes([0x42; 20])),
            gas: 25_200,
            ..Default::default()
        };
        let signed = signer.sign_transaction(&tx).await.unwrap();
        assert!(signer.verify_signature(&signed).unwrap());

        let other = PrivateKeySigner::random(1223);
        assert!(!other.verify_signature(&signed).unwrap());

        let other_chain = PrivateKeySigner::from_hex(TEST_KEY, 1).unwrap();
        assert!(!other_chain.verify_signature(&signed).unwrap());
    }

    #[test]
    fn test_verify_signature_bad_v() {
        let signer = PrivateKeySigner::from_hex(TEST_KEY, 1).unwrap();
        let signed = SignedTransaction::new(
            Transaction::default(),
            TxSignature::new(30, H256::from_bytes([1; 32]), H256::from_bytes([2; 32])),
        );
        assert!(matches!(signer.verify_signature(&signed), Err(SdkError::Signing(_))));
    }

    #[tokio::test]
    async fn test_sign_transaction_recovers_sender() {
        let signer = PrivateKeySigner::from_hex(TEST_KEY, 1223).unwrap();
        let tx = Transaction {
            to: Some(Address::from_bytes([0x42; 20])),
            gas: 25_200,
            ..Default::default()
        };
        let signed = signer.sign_transaction(&tx).await.unwrap();
        assert_eq!(signed.transaction(), &tx);
        assert_eq!(signed.signature().chain_id(), 1223);
        assert_eq!(signed.recover_sender().unwrap(), signer.address());
    }
}
