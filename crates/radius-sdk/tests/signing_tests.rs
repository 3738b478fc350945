//! Signer tests: private key signing, EIP-155 `v` and custom signers

use std::time::Duration;

use async_trait::async_trait;
use radius_crypto::{hash_message, recover_address, Signature};
use radius_sdk::{
    Address, ClientOptions, MockTransport, PrivateKeySigner, SdkError, SignedTransaction, Signer,
    SignerClient, Transaction, H256, U256,
};
use reqwest_middleware::ClientWithMiddleware;

const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn transfer() -> Transaction {
    Transaction {
        nonce: 3,
        gas: 25_200,
        to: Some(Address::from_bytes([0x35; 20])),
        value: U256::from(1_000u64),
        ..Default::default()
    }
}

/// SignerClient whose chain id lookup always fails
struct Unreachable;

#[async_trait]
impl SignerClient for Unreachable {
    async fn chain_id(&self) -> Result<u64, SdkError> {
        Err(SdkError::Network("connection refused".to_string()))
    }

    fn http_client(&self) -> ClientWithMiddleware {
        ClientOptions::default().build_http_client()
    }
}

// ==================== Messages ====================

#[tokio::test]
async fn test_sign_message_deterministic() {
    let signer = PrivateKeySigner::from_hex(KEY, 1).unwrap();
    let a = signer.sign_message(b"hello world").await.unwrap();
    let b = signer.sign_message(b"hello world").await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 65);
    assert!(a[64] == 27 || a[64] == 28);
}

#[tokio::test]
async fn test_sign_message_recovers_signer() {
    let signer = PrivateKeySigner::random(0);
    let bytes: [u8; 65] = signer
        .sign_message(b"radius")
        .await
        .unwrap()
        .try_into()
        .unwrap();
    let recovered = recover_address(&hash_message(b"radius"), &Signature::from_bytes(&bytes)).unwrap();
    assert_eq!(recovered, signer.address());
}

#[tokio::test]
async fn test_sign_message_independent_of_chain_id() {
    let key = radius_crypto::private_key_from_hex(KEY).unwrap();
    let mainnet = PrivateKeySigner::new(key.clone(), 1);
    let legacy = PrivateKeySigner::new(key, 0);
    assert_eq!(
        mainnet.sign_message(b"x").await.unwrap(),
        legacy.sign_message(b"x").await.unwrap()
    );
}

// ==================== Transactions ====================

#[tokio::test]
async fn test_eip155_v_across_chain_ids() {
    let key = radius_crypto::private_key_from_hex(KEY).unwrap();
    for chain_id in [1u64, 5, 1223, 72_344] {
        let signer = PrivateKeySigner::new(key.clone(), chain_id);
        let signed = signer.sign_transaction(&transfer()).await.unwrap();
        let v = signed.signature().v;
        assert!(
            v == 35 + 2 * chain_id || v == 36 + 2 * chain_id,
            "chain {} gave v {}",
            chain_id,
            v
        );
        assert_eq!(signed.signature().chain_id(), chain_id);
        assert_eq!(signed.recover_sender().unwrap(), signer.address());
    }
}

#[tokio::test]
async fn test_chain_id_zero_uses_legacy_v() {
    let signer = PrivateKeySigner::from_hex(KEY, 0).unwrap();
    let signed = signer.sign_transaction(&transfer()).await.unwrap();
    assert!(signed.signature().v == 27 || signed.signature().v == 28);
    assert_eq!(signed.recover_sender().unwrap(), signer.address());
}

#[tokio::test]
async fn test_sign_transaction_deterministic() {
    let signer = PrivateKeySigner::from_hex(KEY, 1223).unwrap();
    let a = signer.sign_transaction(&transfer()).await.unwrap();
    let b = signer.sign_transaction(&transfer()).await.unwrap();
    assert_eq!(a.serialized(), b.serialized());
    assert_eq!(a.hash(), b.hash());
    assert_eq!(SignedTransaction::decode(a.serialized()).unwrap().transaction(), &transfer());
}

#[tokio::test]
async fn test_hash_binds_chain_id() {
    let key = radius_crypto::private_key_from_hex(KEY).unwrap();
    let tx = transfer();
    assert_ne!(
        PrivateKeySigner::new(key.clone(), 1).hash(&tx),
        PrivateKeySigner::new(key, 2).hash(&tx)
    );
}

// ==================== Chain id resolution ====================

#[tokio::test]
async fn test_connect_falls_back_to_chain_id_zero() {
    let key = radius_crypto::private_key_from_hex(KEY).unwrap();
    let signer = PrivateKeySigner::connect(key, &Unreachable).await;
    assert_eq!(signer.chain_id(), 0);

    let signed = signer.sign_transaction(&transfer()).await.unwrap();
    assert!(signed.signature().v == 27 || signed.signature().v == 28);
}

#[tokio::test]
async fn test_connect_uses_client_chain_id() {
    let mock = MockTransport::new();
    mock.set_response("eth_chainId", serde_json::json!("0x4c7"));
    let client = radius_sdk::Client::with_transport(mock).await.unwrap();

    let signer = PrivateKeySigner::connect(radius_crypto::generate_private_key(), &client).await;
    assert_eq!(signer.chain_id(), 1223);
}

#[test]
fn test_debug_hides_key() {
    let signer = PrivateKeySigner::from_hex(KEY, 1).unwrap();
    let debug = format!("{:?}", signer);
    assert!(!debug.contains("ac0974bec39a17e3"));
    assert!(debug.contains("chain_id"));
}

// ==================== Custom signers ====================

/// Wraps another signer and counts how many transactions it signed
struct CountingSigner {
    inner: PrivateKeySigner,
    signed: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl Signer for CountingSigner {
    fn address(&self) -> Address {
        self.inner.address()
    }

    fn chain_id(&self) -> u64 {
        self.inner.chain_id()
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SdkError> {
        self.inner.sign_message(message).await
    }

    async fn sign_transaction(&self, tx: &Transaction) -> Result<SignedTransaction, SdkError> {
        self.signed
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.inner.sign_transaction(tx).await
    }
}

#[tokio::test]
async fn test_custom_signer_drives_client() {
    let mock = MockTransport::new();
    mock.set_response(
        "eth_getTransactionReceipt",
        serde_json::json!({
            "transactionHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            "status": "0x1",
            "gasUsed": "0x5208",
            "logs": []
        }),
    );
    let client = radius_sdk::Client::with_transport(mock)
        .await
        .unwrap()
        .with_poll_interval(Duration::from_millis(1));

    let signer = CountingSigner {
        inner: PrivateKeySigner::random(1),
        signed: Default::default(),
    };
    let receipt = client
        .send(&signer, &Address::from_bytes([0x01; 20]), U256::one())
        .await
        .unwrap();
    assert_eq!(receipt.from, signer.address());
    assert_eq!(
        receipt.tx_hash,
        H256::from_hex("0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b").unwrap()
    );
    assert_eq!(signer.signed.load(std::sync::atomic::Ordering::SeqCst), 1);
}
