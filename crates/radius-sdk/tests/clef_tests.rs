//! Clef signer tests against a mock HTTP signing service

use mockito::{Matcher, Server};
use radius_sdk::{Address, ClefSigner, Client, MockTransport, SdkError, Signer};
use serde_json::json;

fn account() -> Address {
    "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap()
}

#[tokio::test]
async fn test_connect_checks_version_and_signs() {
    let mut server = Server::new_async().await;
    let version = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({"method": "account_version"})))
        .with_header("content-type", "application/json")
        .with_body(json!({"jsonrpc": "2.0", "id": 1, "result": "6.0.0"}).to_string())
        .create_async()
        .await;
    let sign = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "account_signData",
            "params": ["text/plain", "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", "0x6869"],
        })))
        .with_header("content-type", "application/json")
        .with_body(
            json!({"jsonrpc": "2.0", "id": 2, "result": format!("0x{}1b", "ab".repeat(64))})
                .to_string(),
        )
        .create_async()
        .await;

    let mock = MockTransport::new();
    mock.set_response("eth_chainId", json!("0x4c7"));
    let client = Client::with_transport(mock).await.unwrap();

    let signer = ClefSigner::connect(account(), &client, &server.url())
        .await
        .unwrap();
    assert_eq!(signer.address(), account());
    assert_eq!(signer.chain_id(), 1223);

    let signature = signer.sign_message(b"hi").await.unwrap();
    assert_eq!(signature.len(), 65);
    assert_eq!(signature[64], 0x1b);

    version.assert_async().await;
    sign.assert_async().await;
}

#[tokio::test]
async fn test_connect_fails_when_clef_unavailable() {
    let mut server = Server::new_async().await;
    let _down = server
        .mock("POST", "/")
        .with_status(503)
        .with_body("unavailable")
        .create_async()
        .await;

    let client = Client::with_transport(MockTransport::new()).await.unwrap();
    let err = ClefSigner::connect(account(), &client, &server.url())
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Signing(_)));
}

#[tokio::test]
async fn test_clef_rpc_error_is_signing_error() {
    let mut server = Server::new_async().await;
    let _version = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({"method": "account_version"})))
        .with_header("content-type", "application/json")
        .with_body(json!({"jsonrpc": "2.0", "id": 1, "result": "6.0.0"}).to_string())
        .create_async()
        .await;
    let _denied = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({"method": "account_signTransaction"})))
        .with_header("content-type", "application/json")
        .with_body(
            json!({"jsonrpc": "2.0", "id": 2, "error": {"code": -32000, "message": "Request denied"}})
                .to_string(),
        )
        .create_async()
        .await;

    let client = Client::with_transport(MockTransport::new()).await.unwrap();
    let signer = ClefSigner::connect(account(), &client, &server.url())
        .await
        .unwrap();
    let err = signer
        .sign_transaction(&Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Signing(ref m) if m.contains("Request denied")));
}
