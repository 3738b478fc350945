//! Radius client: queries, contract calls and transaction submission

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use radius_primitives::{Address, H256, U256};
use radius_types::SignedTransaction;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use tracing::{debug, info, trace};

use crate::abi::{bytecode_from_hex, Abi, Token};
use crate::contract::Contract;
use crate::options::ClientOptions;
use crate::prepare::TxParams;
use crate::quantity;
use crate::receipt::{Receipt, RpcReceipt};
use crate::signer::{Signer, SignerClient};
use crate::transport::{deserialize_response, HttpTransport, Transport};
use crate::types::{BlockId, CallRequest};
use crate::SdkError;

/// Client for a Radius node.
///
/// Holds one transport for its whole lifetime and no per-call mutable
/// state, so it can be shared behind an `Arc`.
pub struct Client {
    transport: Box<dyn Transport>,
    chain_id: u64,
    http_client: ClientWithMiddleware,
    receipt_timeout: Duration,
    poll_interval: Duration,
}

impl Client {
    /// Connect to the node at `url` with default options
    pub async fn connect(url: &str) -> Result<Self, SdkError> {
        Self::connect_with_options(url, ClientOptions::default()).await
    }

    /// Connect to the node at `url`.
    ///
    /// The chain ID is fetched once here; if that fails no client is built.
    pub async fn connect_with_options(url: &str, options: ClientOptions) -> Result<Self, SdkError> {
        let http_client = options.build_http_client();
        let transport = HttpTransport::new(url, http_client.clone());
        let client = Self::build(Box::new(transport), http_client, &options).await?;
        info!(%url, chain_id = client.chain_id, "connected to radius node");
        Ok(client)
    }

    /// Create a client over a custom transport with default options
    pub async fn with_transport(transport: impl Transport + 'static) -> Result<Self, SdkError> {
        Self::with_transport_and_options(transport, ClientOptions::default()).await
    }

    /// Create a client over a custom transport.
    ///
    /// Receipt timing comes from `options`. The logger and interceptor apply
    /// to the HTTP client handed to signers such as [`ClefSigner`](crate::ClefSigner);
    /// requests made by `transport` itself are its own concern.
    pub async fn with_transport_and_options(
        transport: impl Transport + 'static,
        options: ClientOptions,
    ) -> Result<Self, SdkError> {
        Self::build(Box::new(transport), options.build_http_client(), &options).await
    }

    async fn build(
        transport: Box<dyn Transport>,
        http_client: ClientWithMiddleware,
        options: &ClientOptions,
    ) -> Result<Self, SdkError> {
        let result: String = deserialize_response(transport.request_json("eth_chainId", vec![]).await?)?;
        let chain_id = quantity::parse_u64(&result)?;
        Ok(Self {
            transport,
            chain_id,
            http_client,
            receipt_timeout: options.receipt_timeout,
            poll_interval: options.poll_interval,
        })
    }

    /// Set how long [`Client::wait_for_receipt`] waits
    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

    /// Set the receipt polling interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Raw JSON-RPC request; the result is deserialized into `T`
    pub async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, SdkError> {
        let value = self.transport.request_json(method, params).await?;
        deserialize_response(value)
    }

    // ==================== Chain Info ====================

    /// Chain ID fetched at construction
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Current block number
    pub async fn block_number(&self) -> Result<u64, SdkError> {
        let result: String = self.request("eth_blockNumber", vec![]).await?;
        quantity::parse_u64(&result)
    }

    // ==================== Account Queries ====================

    /// Balance in wei at the latest block
    pub async fn balance_at(&self, address: &Address) -> Result<U256, SdkError> {
        let result: String = self
            .request(
                "eth_getBalance",
                vec![
                    Value::String(address.to_hex()),
                    serde_json::to_value(BlockId::Latest)?,
                ],
            )
            .await?;
        quantity::parse_u256(&result)
    }

    /// Code deployed at `address`; empty for plain accounts
    pub async fn code_at(&self, address: &Address) -> Result<Bytes, SdkError> {
        let result: String = self
            .request(
                "eth_getCode",
                vec![
                    Value::String(address.to_hex()),
                    serde_json::to_value(BlockId::Latest)?,
                ],
            )
            .await?;
        quantity::parse_bytes(&result)
    }

    // ==================== Contracts ====================

    /// Read-only contract call.
    ///
    /// Failures after the address check are reported as
    /// [`SdkError::ContractCall`].
    pub async fn call(
        &self,
        contract: &Contract,
        method: &str,
        args: &[Token],
    ) -> Result<Vec<Token>, SdkError> {
        check_contract_address(contract)?;
        self.call_inner(contract, method, args)
            .await
            .map_err(|e| SdkError::contract_call(method, e))
    }

    async fn call_inner(
        &self,
        contract: &Contract,
        method: &str,
        args: &[Token],
    ) -> Result<Vec<Token>, SdkError> {
        let data = contract.abi().pack(method, args)?;
        let tx = self
            .prepare_transaction(TxParams {
                data: Bytes::from(data),
                to: Some(contract.address()),
                ..Default::default()
            })
            .await?;

        let request = CallRequest::for_call(&tx);
        let result: String = self
            .request(
                "eth_call",
                vec![
                    serde_json::to_value(&request)?,
                    serde_json::to_value(BlockId::Latest)?,
                ],
            )
            .await?;
        let output = quantity::parse_bytes(&result)?;
        contract.abi().unpack(method, &output)
    }

    /// State-changing contract call, signed by `signer`.
    ///
    /// Encoding failures are wrapped in [`SdkError::ContractCall`]; once the
    /// transaction is built, broadcast and receipt errors are returned as is.
    pub async fn execute(
        &self,
        contract: &Contract,
        signer: &dyn Signer,
        method: &str,
        args: &[Token],
    ) -> Result<Receipt, SdkError> {
        self.execute_with_value(contract, signer, U256::zero(), method, args)
            .await
    }

    /// [`Client::execute`] attaching `value` wei, for payable methods
    pub async fn execute_with_value(
        &self,
        contract: &Contract,
        signer: &dyn Signer,
        value: U256,
        method: &str,
        args: &[Token],
    ) -> Result<Receipt, SdkError> {
        check_contract_address(contract)?;
        let data = contract
            .abi()
            .pack(method, args)
            .map_err(|e| SdkError::contract_call(method, e))?;

        let tx = self
            .prepare_transaction(TxParams {
                data: Bytes::from(data),
                signer: Some(signer),
                to: Some(contract.address()),
                value,
            })
            .await?;
        let signed = signer.sign_transaction(&tx).await?;
        self.transact_with_abi(signer, &signed, Some(contract.abi()))
            .await
    }

    /// Deploy `bytecode` with encoded constructor `args`
    pub async fn deploy_contract(
        &self,
        signer: &dyn Signer,
        bytecode: &[u8],
        abi: Arc<Abi>,
        args: &[Token],
    ) -> Result<Contract, SdkError> {
        if bytecode.is_empty() {
            return Err(SdkError::InvalidArgument("contract bytecode is empty".to_string()));
        }
        let data = abi.pack_constructor(bytecode, args)?;

        let tx = self
            .prepare_transaction(TxParams {
                data: Bytes::from(data),
                signer: Some(signer),
                ..Default::default()
            })
            .await?;
        let signed = signer.sign_transaction(&tx).await?;
        let receipt = self.transact_with_abi(signer, &signed, Some(&abi)).await?;

        let address = receipt
            .contract_address
            .ok_or_else(|| SdkError::MissingField("contractAddress".to_string()))?;
        info!(%address, tx_hash = %receipt.tx_hash, "contract deployed");
        Ok(Contract::new(address, abi))
    }

    /// Deploy from a JSON ABI and hex bytecode
    pub async fn deploy_contract_from_strings(
        &self,
        signer: &dyn Signer,
        abi_json: &str,
        bytecode_hex: &str,
        args: &[Token],
    ) -> Result<Contract, SdkError> {
        let abi = Abi::from_json(abi_json)?;
        let bytecode = bytecode_from_hex(bytecode_hex)
            .ok_or_else(|| SdkError::InvalidArgument("failed to parse bytecode".to_string()))?;
        self.deploy_contract(signer, &bytecode, Arc::new(abi), args)
            .await
    }

    // ==================== Transactions ====================

    /// Transfer `value` wei to `recipient`
    pub async fn send(
        &self,
        signer: &dyn Signer,
        recipient: &Address,
        value: U256,
    ) -> Result<Receipt, SdkError> {
        let tx = self
            .prepare_transaction(TxParams {
                signer: Some(signer),
                to: Some(*recipient),
                value,
                ..Default::default()
            })
            .await?;
        let signed = signer.sign_transaction(&tx).await?;
        self.transact(signer, &signed).await
    }

    /// Broadcast a signed transaction and wait for a successful receipt
    pub async fn transact(
        &self,
        signer: &dyn Signer,
        signed: &SignedTransaction,
    ) -> Result<Receipt, SdkError> {
        self.transact_with_abi(signer, signed, None).await
    }

    async fn transact_with_abi(
        &self,
        signer: &dyn Signer,
        signed: &SignedTransaction,
        abi: Option<&Abi>,
    ) -> Result<Receipt, SdkError> {
        let tx_hash = self
            .send_raw_transaction(signed.serialized())
            .await
            .map_err(|e| SdkError::Broadcast(e.to_string()))?;
        info!(%tx_hash, "transaction broadcast");

        let rpc = self.wait_for_receipt(tx_hash).await?;
        let status = rpc.status.ok_or(SdkError::MissingStatus {
            tx_hash: rpc.transaction_hash,
        })?;
        if status != 1 {
            return Err(SdkError::Transaction {
                status,
                tx_hash: rpc.transaction_hash,
            });
        }
        info!(%tx_hash, gas_used = rpc.gas_used, block = ?rpc.block_number, "transaction mined");

        let tx = signed.transaction();
        Ok(Receipt::from_rpc(&rpc, signer.address(), tx.to, tx.value, abi))
    }

    /// Submit raw transaction bytes; returns the node's transaction hash
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<H256, SdkError> {
        let result: String = self
            .request(
                "eth_sendRawTransaction",
                vec![Value::String(quantity::encode_bytes(raw))],
            )
            .await?;
        Ok(H256::from_hex(&result)?)
    }

    /// Receipt for `tx_hash`, or `None` while it is not mined
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: &H256,
    ) -> Result<Option<RpcReceipt>, SdkError> {
        self.request(
            "eth_getTransactionReceipt",
            vec![Value::String(tx_hash.to_hex())],
        )
        .await
    }

    /// Poll for the receipt of `tx_hash` until the client's receipt timeout.
    ///
    /// Dropping the returned future stops polling; the transaction itself
    /// may still be mined afterwards.
    pub async fn wait_for_receipt(&self, tx_hash: H256) -> Result<RpcReceipt, SdkError> {
        self.wait_for_receipt_within(tx_hash, self.receipt_timeout)
            .await
    }

    /// [`Client::wait_for_receipt`] with a caller-chosen deadline
    pub async fn wait_for_receipt_within(
        &self,
        tx_hash: H256,
        timeout: Duration,
    ) -> Result<RpcReceipt, SdkError> {
        let poll = async {
            loop {
                if let Some(receipt) = self.get_transaction_receipt(&tx_hash).await? {
                    return Ok::<_, SdkError>(receipt);
                }
                trace!(%tx_hash, "receipt not available yet");
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => result,
            Err(_) => {
                debug!(%tx_hash, ?timeout, "gave up waiting for receipt");
                Err(SdkError::ReceiptTimeout { tx_hash })
            }
        }
    }
}

fn check_contract_address(contract: &Contract) -> Result<(), SdkError> {
    if contract.address().is_zero() {
        return Err(SdkError::InvalidArgument("contract address is required".to_string()));
    }
    Ok(())
}

#[async_trait]
impl SignerClient for Client {
    async fn chain_id(&self) -> Result<u64, SdkError> {
        Ok(self.chain_id)
    }

    fn http_client(&self) -> ClientWithMiddleware {
        self.http_client.clone()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("chain_id", &self.chain_id)
            .field("receipt_timeout", &self.receipt_timeout)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}
