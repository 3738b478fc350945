//! Transaction preparation: nonce lookup and gas estimation

use bytes::Bytes;
use radius_primitives::{Address, U256};
use radius_types::Transaction;
use serde_json::Value;

use crate::signer::Signer;
use crate::types::{BlockId, CallRequest};
use crate::{Client, SdkError};

/// Upper bound applied to every gas estimate
pub const MAX_GAS: u64 = 1_319_413_953_330;

/// Add 20% headroom to an estimate, clamped to [`MAX_GAS`].
pub fn apply_gas_margin(estimate: u64) -> u64 {
    estimate.saturating_add(estimate / 5).min(MAX_GAS)
}

/// Inputs to [`Client::prepare_transaction`]
#[derive(Clone, Default)]
pub struct TxParams<'a> {
    /// Call data or init code
    pub data: Bytes,
    /// Signer; when absent the nonce is 0
    pub signer: Option<&'a dyn Signer>,
    /// Destination; `None` or the zero address means contract creation
    pub to: Option<Address>,
    /// Value in wei
    pub value: U256,
}

impl Client {
    /// Estimate gas for `tx` and apply the margin.
    ///
    /// Estimation runs from the signer address when one is known so the
    /// node evaluates the call with the right `msg.sender`.
    pub async fn estimate_gas(&self, tx: &Transaction) -> Result<u64, SdkError> {
        self.estimate_gas_from(tx, None).await
    }

    pub(crate) async fn estimate_gas_from(
        &self,
        tx: &Transaction,
        from: Option<Address>,
    ) -> Result<u64, SdkError> {
        let request = CallRequest::from_transaction(tx, from);
        let result: String = self
            .request(
                "eth_estimateGas",
                vec![serde_json::to_value(&request)?],
            )
            .await
            .map_err(|e| SdkError::Estimation(e.to_string()))?;
        let estimate = crate::quantity::parse_u64(&result)
            .map_err(|e| SdkError::Estimation(e.to_string()))?;
        let gas = apply_gas_margin(estimate);
        tracing::debug!(estimate, gas, "estimated gas");
        Ok(gas)
    }

    /// Build an unsigned transaction ready for signing.
    ///
    /// Gas price is always 0 on this platform.
    pub async fn prepare_transaction(&self, params: TxParams<'_>) -> Result<Transaction, SdkError> {
        let from = params.signer.map(|s| s.address());
        let nonce = match from {
            Some(address) => self.pending_nonce_at(&address).await?,
            None => 0,
        };

        let tx = Transaction {
            data: params.data,
            gas: 0,
            gas_price: U256::zero(),
            nonce,
            to: params.to.filter(|to| !to.is_zero()),
            value: params.value,
        };

        let gas = self.estimate_gas_from(&tx, from).await?;
        Ok(tx.with_gas(gas))
    }

    /// Nonce including pending transactions
    pub async fn pending_nonce_at(&self, address: &Address) -> Result<u64, SdkError> {
        let result: String = self
            .request(
                "eth_getTransactionCount",
                vec![
                    Value::String(address.to_hex()),
                    serde_json::to_value(BlockId::Pending)?,
                ],
            )
            .await?;
        crate::quantity::parse_u64(&result)
    }
}
