//! JSON-RPC request types

use bytes::Bytes;
use radius_primitives::{Address, U256};
use radius_types::Transaction;
use serde::Serialize;

use crate::quantity;

/// Block identifier for RPC queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
    /// Block number
    Number(u64),
    /// Latest block
    #[default]
    Latest,
    /// Pending block (includes pending transactions)
    Pending,
    /// Earliest block (genesis)
    Earliest,
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            BlockId::Number(n) => serializer.serialize_str(&quantity::encode_u64(*n)),
            BlockId::Latest => serializer.serialize_str("latest"),
            BlockId::Pending => serializer.serialize_str("pending"),
            BlockId::Earliest => serializer.serialize_str("earliest"),
        }
    }
}

/// Call request for eth_call and eth_estimateGas
#[derive(Debug, Clone, Default)]
pub struct CallRequest {
    /// Sender address
    pub from: Option<Address>,
    /// Recipient address
    pub to: Option<Address>,
    /// Gas limit
    pub gas: Option<u64>,
    /// Gas price
    pub gas_price: Option<U256>,
    /// Value to transfer
    pub value: Option<U256>,
    /// Input data
    pub data: Option<Bytes>,
}

impl CallRequest {
    /// Build a request from an unsigned transaction.
    ///
    /// Zero gas, zero gas price, zero value and empty data are left out so
    /// the node applies its own defaults.
    pub fn from_transaction(tx: &Transaction, from: Option<Address>) -> Self {
        Self {
            from,
            to: tx.to,
            gas: (tx.gas != 0).then_some(tx.gas),
            gas_price: (!tx.gas_price.is_zero()).then_some(tx.gas_price),
            value: (!tx.value.is_zero()).then_some(tx.value),
            data: (!tx.data.is_empty()).then(|| tx.data.clone()),
        }
    }

    /// Request for `eth_call`: only destination, value and data are sent
    pub fn for_call(tx: &Transaction) -> Self {
        Self {
            to: tx.to,
            value: (!tx.value.is_zero()).then_some(tx.value),
            data: (!tx.data.is_empty()).then(|| tx.data.clone()),
            ..Default::default()
        }
    }
}

impl Serialize for CallRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let count = [
            self.from.is_some(),
            self.to.is_some(),
            self.gas.is_some(),
            self.gas_price.is_some(),
            self.value.is_some(),
            self.data.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        let mut map = serializer.serialize_map(Some(count))?;

        if let Some(from) = &self.from {
            map.serialize_entry("from", &from.to_hex())?;
        }
        if let Some(to) = &self.to {
            map.serialize_entry("to", &to.to_hex())?;
        }
        if let Some(gas) = &self.gas {
            map.serialize_entry("gas", &quantity::encode_u64(*gas))?;
        }
        if let Some(gas_price) = &self.gas_price {
            map.serialize_entry("gasPrice", &quantity::encode_u256(gas_price))?;
        }
        if let Some(value) = &self.value {
            map.serialize_entry("value", &quantity::encode_u256(value))?;
        }
        if let Some(data) = &self.data {
            map.serialize_entry("data", &quantity::encode_bytes(data))?;
        }

        map.end()
    }
}
