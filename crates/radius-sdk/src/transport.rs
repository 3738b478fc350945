//! Transport layer for JSON-RPC communication

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::SdkError;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get the JSON `result`
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError>;
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

/// Mock transport for testing.
///
/// Clones share state, so a test can keep one handle while the client owns
/// another and then inspect the requests that were made.
#[derive(Clone)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, Value>>>,
    default_responses: Arc<HashMap<String, Value>>,
    requests: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();

        defaults.insert("eth_chainId".to_string(), Value::String("0x1".to_string()));
        defaults.insert("eth_blockNumber".to_string(), Value::String("0x100".to_string())); // Block 256
        defaults.insert("eth_getBalance".to_string(), Value::String("0xde0b6b3a7640000".to_string())); // 1 ETH
        defaults.insert("eth_getTransactionCount".to_string(), Value::String("0x0".to_string()));
        defaults.insert("eth_estimateGas".to_string(), Value::String("0x5208".to_string())); // 21000
        defaults.insert(
            "eth_sendRawTransaction".to_string(),
            Value::String(
                "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b".to_string(),
            ),
        );
        defaults.insert("eth_call".to_string(), Value::String("0x".to_string()));
        defaults.insert("eth_getCode".to_string(), Value::String("0x".to_string()));

        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_responses: Arc::new(defaults),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a mock response for a specific method
    pub fn set_response(&self, method: &str, response: Value) {
        lock(&self.responses).insert(method.to_string(), response);
    }

    /// Methods requested so far, in order
    pub fn requested_methods(&self) -> Vec<String> {
        lock(&self.requests)
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    /// Params of the last request for `method`
    pub fn last_params(&self, method: &str) -> Option<Vec<Value>> {
        lock(&self.requests)
            .iter()
            .rev()
            .find(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
    }
}

// a panicking test thread leaves the maps intact, so keep serving them
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        lock(&self.requests).push((method.to_string(), params));

        let custom_response = lock(&self.responses).get(method).cloned();

        // a JSON-RPC error object stands in for a node-side failure
        if let Some(response) = custom_response {
            if let Some(error) = response.get("error") {
                return Err(SdkError::Rpc {
                    code: error.get("code").and_then(Value::as_i64).unwrap_or(-32000),
                    message: error
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                });
            }
            return Ok(response);
        }

        if let Some(response) = self.default_responses.get(method) {
            return Ok(response.clone());
        }

        Err(SdkError::Rpc {
            code: -32601,
            message: format!("Method not found: {}", method),
        })
    }
}

/// JSON-RPC 2.0 transport over HTTP
pub struct HttpTransport {
    client: ClientWithMiddleware,
    url: String,
    request_id: AtomicU64,
}

impl HttpTransport {
    /// Create a transport sending requests to `url` through `client`
    pub fn new(url: &str, client: ClientWithMiddleware) -> Self {
        Self {
            client,
            url: url.to_string(),
            request_id: AtomicU64::new(1),
        }
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        let id = self.next_id();
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::debug!(method, id, url = %self.url, "JSON-RPC request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SdkError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SdkError::Network(e.to_string()))?;
        let response: JsonRpcResponse = serde_json::from_slice(&body).map_err(|e| {
            if status.is_success() {
                SdkError::Serialization(e.to_string())
            } else {
                SdkError::Network(format!("HTTP {}", status))
            }
        })?;

        if let Some(error) = response.error {
            tracing::debug!(method, code = error.code, "JSON-RPC error");
            return Err(SdkError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        // `null` is a valid result (e.g. a receipt that is not mined yet)
        Ok(response.result.unwrap_or(Value::Null))
    }
}

#[derive(serde::Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(serde::Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_default_responses() {
        let transport = MockTransport::new();

        let result = transport.request_json("eth_chainId", vec![]).await.unwrap();
        assert_eq!(result, Value::String("0x1".to_string()));
    }

    #[tokio::test]
    async fn test_mock_transport_custom_response() {
        let transport = MockTransport::new();
        transport.set_response("eth_chainId", Value::String("0x5".to_string()));

        let result = transport.request_json("eth_chainId", vec![]).await.unwrap();
        assert_eq!(result, Value::String("0x5".to_string()));
    }

    #[tokio::test]
    async fn test_mock_transport_error_response() {
        let transport = MockTransport::new();
        transport.set_response(
            "eth_estimateGas",
            serde_json::json!({"error": {"code": -32000, "message": "execution reverted"}}),
        );

        let err = transport
            .request_json("eth_estimateGas", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Rpc { code: -32000, .. }));
    }

    #[tokio::test]
    async fn test_mock_transport_survives_poisoned_lock() {
        let transport = MockTransport::new();
        let requests = Arc::clone(&transport.requests);
        let _ = std::thread::spawn(move || {
            let _guard = requests.lock().unwrap();
            panic!("poison the request log");
        })
        .join();
        assert!(transport.requests.is_poisoned());

        transport.set_response("eth_chainId", Value::String("0x7".to_string()));
        let result = transport.request_json("eth_chainId", vec![]).await.unwrap();
        assert_eq!(result, Value::String("0x7".to_string()));
        assert_eq!(transport.requested_methods(), vec!["eth_chainId"]);
    }

    #[tokio::test]
    async fn test_mock_transport_records_requests() {
        let transport = MockTransport::new();
        let handle = transport.clone();

        transport
            .request_json("eth_getBalance", vec![Value::String("0xabc".into())])
            .await
            .unwrap();
        assert_eq!(handle.requested_methods(), vec!["eth_getBalance"]);
        assert_eq!(
            handle.last_params("eth_getBalance"),
            Some(vec![Value::String("0xabc".into())])
        );
    }

    #[tokio::test]
    async fn test_mock_transport_unknown_method() {
        let transport = MockTransport::new();
        assert!(transport.request_json("unknown_method", vec![]).await.is_err());
    }
}
