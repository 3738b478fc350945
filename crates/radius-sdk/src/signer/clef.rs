//! Signer backed by an external Clef signing service

use async_trait::async_trait;
use radius_primitives::{Address, H256, U256};
use radius_types::{SignedTransaction, Transaction, TxSignature};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{resolve_chain_id, Signer, SignerClient};
use crate::quantity;
use crate::transport::{deserialize_response, HttpTransport, Transport};
use crate::SdkError;

/// Delegates signing to Clef over JSON-RPC
pub struct ClefSigner {
    address: Address,
    chain_id: u64,
    transport: Box<dyn Transport>,
}

impl ClefSigner {
    /// Connect to Clef at `url` for `address`.
    ///
    /// Fails if Clef does not answer `account_version`. The chain ID comes
    /// from `client` and falls back to 0 like [`PrivateKeySigner::connect`](super::PrivateKeySigner::connect).
    pub async fn connect(
        address: Address,
        client: &dyn SignerClient,
        url: &str,
    ) -> Result<Self, SdkError> {
        let transport = HttpTransport::new(url, client.http_client());
        let version: Value = transport
            .request_json("account_version", vec![])
            .await
            .map_err(|e| SdkError::Signing(format!("clef at {} is not reachable: {}", url, e)))?;
        tracing::debug!(%url, %version, "connected to clef");

        let chain_id = resolve_chain_id(client).await;
        Ok(Self::with_transport(address, chain_id, transport))
    }

    /// Use an existing transport; no liveness check is made
    pub fn with_transport(
        address: Address,
        chain_id: u64,
        transport: impl Transport + 'static,
    ) -> Self {
        Self {
            address,
            chain_id,
            transport: Box::new(transport),
        }
    }

    fn transaction_args(&self, tx: &Transaction) -> Value {
        let mut args = Map::new();
        args.insert("from".into(), json!(self.address.to_checksum()));
        if let Some(to) = &tx.to {
            args.insert("to".into(), json!(to.to_checksum()));
        }
        args.insert("gas".into(), json!(quantity::encode_u64(tx.gas)));
        args.insert("gasPrice".into(), json!(quantity::encode_u256(&tx.gas_price)));
        args.insert("value".into(), json!(quantity::encode_u256(&tx.value)));
        args.insert("nonce".into(), json!(quantity::encode_u64(tx.nonce)));
        args.insert("data".into(), json!(quantity::encode_bytes(&tx.data)));
        args.insert("chainId".into(), json!(quantity::encode_u64(self.chain_id)));
        Value::Object(args)
    }
}

#[derive(Deserialize)]
struct SignTransactionResult {
    raw: String,
    tx: SignedFields,
}

#[derive(Deserialize)]
struct SignedFields {
    v: String,
    r: String,
    s: String,
}

fn signing_error(what: &str, e: impl std::fmt::Display) -> SdkError {
    SdkError::Signing(format!("malformed clef response ({}): {}", what, e))
}

fn parse_word(s: &str, what: &str) -> Result<H256, SdkError> {
    let value: U256 = quantity::parse_u256(s).map_err(|e| signing_error(what, e))?;
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    Ok(H256::from_bytes(bytes))
}

#[async_trait]
impl Signer for ClefSigner {
    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SdkError> {
        let result = self
            .transport
            .request_json(
                "account_signData",
                vec![
                    json!("text/plain"),
                    json!(self.address.to_checksum()),
                    json!(quantity::encode_bytes(message)),
                ],
            )
            .await
            .map_err(|e| SdkError::Signing(e.to_string()))?;

        let hex_sig: String = deserialize_response(result).map_err(|e| signing_error("signature", e))?;
        let signature = quantity::parse_bytes(&hex_sig).map_err(|e| signing_error("signature", e))?;
        if signature.len() != 65 {
            return Err(signing_error(
                "signature",
                format!("expected 65 bytes, got {}", signature.len()),
            ));
        }
        Ok(signature.to_vec())
    }

    async fn sign_transaction(&self, tx: &Transaction) -> Result<SignedTransaction, SdkError> {
        let result = self
            .transport
            .request_json("account_signTransaction", vec![self.transaction_args(tx)])
            .await
            .map_err(|e| SdkError::Signing(e.to_string()))?;

        let result: SignTransactionResult =
            deserialize_response(result).map_err(|e| signing_error("transaction", e))?;
        let raw = quantity::parse_bytes(&result.raw).map_err(|e| signing_error("raw", e))?;
        if raw.is_empty() {
            return Err(signing_error("raw", "empty"));
        }
        let v = quantity::parse_u64(&result.tx.v).map_err(|e| signing_error("v", e))?;
        let signature = TxSignature::new(
            v,
            parse_word(&result.tx.r, "r")?,
            parse_word(&result.tx.s, "s")?,
        );

        Ok(SignedTransaction::from_parts(tx.clone(), signature, raw))
    }
}

impl std::fmt::Debug for ClefSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClefSigner")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockTransport;

    fn signer(mock: &MockTransport) -> ClefSigner {
        ClefSigner::with_transport(Address::from_bytes([0x5a; 20]), 1223, mock.clone())
    }

    #[tokio::test]
    async fn test_sign_message_params() {
        let mock = MockTransport::new();
        mock.set_response("account_signData", json!(format!("0x{}", "11".repeat(65))));

        let sig = signer(&mock).sign_message(b"hi").await.unwrap();
        assert_eq!(sig, vec![0x11; 65]);

        let params = mock.last_params("account_signData").unwrap();
        assert_eq!(params[0], "text/plain");
        assert_eq!(params[2], "0x6869");
    }

    #[tokio::test]
    async fn test_sign_message_wrong_length() {
        let mock = MockTransport::new();
        mock.set_response("account_signData", json!("0x1234"));
        assert!(matches!(
            signer(&mock).sign_message(b"hi").await,
            Err(SdkError::Signing(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_transaction_parses_response() {
        let mock = MockTransport::new();
        mock.set_response(
            "account_signTransaction",
            json!({
                "raw": "0xf86c0102",
                "tx": {"hash": "0x00", "v": "0x9b1", "r": "0x1", "s": "0x2"}
            }),
        );

        let tx = Transaction {
            to: Some(Address::from_bytes([0x01; 20])),
            gas: 21000,
            nonce: 4,
            ..Default::default()
        };
        let signed = signer(&mock).sign_transaction(&tx).await.unwrap();
        assert_eq!(signed.serialized().as_ref(), &[0xf8, 0x6c, 0x01, 0x02]);
        assert_eq!(signed.signature().v, 0x9b1);
        assert_eq!(signed.signature().r.as_bytes()[31], 1);

        let args = &mock.last_params("account_signTransaction").unwrap()[0];
        assert_eq!(args["gas"], "0x5208");
        assert_eq!(args["nonce"], "0x4");
        assert_eq!(args["chainId"], "0x4c7");
        assert_eq!(args["data"], "0x");
    }

    #[tokio::test]
    async fn test_sign_transaction_malformed() {
        let mock = MockTransport::new();
        mock.set_response("account_signTransaction", json!({"raw": "0xf8"}));
        assert!(matches!(
            signer(&mock).sign_transaction(&Transaction::default()).await,
            Err(SdkError::Signing(_))
        ));
    }

    #[tokio::test]
    async fn test_creation_omits_to() {
        let mock = MockTransport::new();
        let args = signer(&mock).transaction_args(&Transaction::default());
        assert!(args.get("to").is_none());
    }
}
