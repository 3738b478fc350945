//! Deployed contract handle

use std::sync::Arc;

use bytes::Bytes;
use radius_primitives::{Address, U256};
use tokio::sync::OnceCell;

use crate::abi::{Abi, Token};
use crate::receipt::Receipt;
use crate::signer::Signer;
use crate::{Client, SdkError};

/// A contract address paired with its ABI.
///
/// The ABI is shared, so cloning a handle or creating many handles for the
/// same contract type is cheap. Deployed code is fetched once per handle.
#[derive(Debug, Clone)]
pub struct Contract {
    address: Address,
    abi: Arc<Abi>,
    code: OnceCell<Bytes>,
}

impl Contract {
    /// Create a handle for the contract at `address`
    pub fn new(address: Address, abi: Arc<Abi>) -> Self {
        Self {
            address,
            abi,
            code: OnceCell::new(),
        }
    }

    /// Contract address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Contract ABI
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// Shared handle to the ABI
    pub fn abi_arc(&self) -> Arc<Abi> {
        Arc::clone(&self.abi)
    }

    /// Read-only call; see [`Client::call`]
    pub async fn call(
        &self,
        client: &Client,
        method: &str,
        args: &[Token],
    ) -> Result<Vec<Token>, SdkError> {
        client.call(self, method, args).await
    }

    /// State-changing call; see [`Client::execute`]
    pub async fn execute(
        &self,
        client: &Client,
        signer: &dyn Signer,
        method: &str,
        args: &[Token],
    ) -> Result<Receipt, SdkError> {
        client.execute(self, signer, method, args).await
    }

    /// Payable call; see [`Client::execute_with_value`]
    pub async fn execute_with_value(
        &self,
        client: &Client,
        signer: &dyn Signer,
        value: U256,
        method: &str,
        args: &[Token],
    ) -> Result<Receipt, SdkError> {
        client
            .execute_with_value(self, signer, value, method, args)
            .await
    }

    /// Code deployed at the contract address, cached after the first fetch
    pub async fn code(&self, client: &Client) -> Result<Bytes, SdkError> {
        self.code
            .get_or_try_init(|| client.code_at(&self.address))
            .await
            .cloned()
    }
}
