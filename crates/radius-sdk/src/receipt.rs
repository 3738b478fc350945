//! Transaction receipts and decoded events

use std::collections::BTreeMap;

use bytes::Bytes;
use radius_primitives::{Address, H256, U256};
use radius_types::Log;
use serde::Deserialize;

use crate::abi::{Abi, Token};
use crate::quantity;

/// Event emitted by a mined transaction.
///
/// `name` and `data` are filled from the contract ABI when the event is
/// known; otherwise `name` is the hex of the first topic and `data` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event name, or topic0 hex when undecoded
    pub name: String,
    /// Decoded parameters keyed by name
    pub data: BTreeMap<String, Token>,
    /// Raw log data
    pub raw: Bytes,
}

impl Event {
    /// Undecoded event for a log
    pub fn from_raw_log(log: &Log) -> Self {
        Self {
            name: log.topic0().map(|t| t.to_hex()).unwrap_or_default(),
            data: BTreeMap::new(),
            raw: log.data.clone(),
        }
    }
}

/// Outcome of a mined transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// Sender (the signer's address)
    pub from: Address,
    /// Recipient, or the zero address for contract creation
    pub to: Address,
    /// Created contract, if any
    pub contract_address: Option<Address>,
    /// Transaction hash
    pub tx_hash: H256,
    /// Gas consumed
    pub gas_used: u64,
    /// 1 for success, 0 for failure
    pub status: u64,
    /// Events in log order
    pub logs: Vec<Event>,
    /// Value transferred
    pub value: U256,
}

impl Receipt {
    /// Check the status flag
    pub fn is_success(&self) -> bool {
        self.status == 1
    }

    /// Translate a node receipt. Logs are decoded with `abi` when given.
    pub fn from_rpc(
        rpc: &RpcReceipt,
        from: Address,
        to: Option<Address>,
        value: U256,
        abi: Option<&Abi>,
    ) -> Self {
        let logs = rpc
            .logs
            .iter()
            .map(|l| {
                let log = l.to_log();
                abi.and_then(|abi| abi.decode_log(&log))
                    .unwrap_or_else(|| Event::from_raw_log(&log))
            })
            .collect();

        Self {
            from,
            to: to.unwrap_or(Address::ZERO),
            contract_address: rpc.contract_address,
            tx_hash: rpc.transaction_hash,
            gas_used: rpc.gas_used,
            status: rpc.status.unwrap_or(0),
            logs,
            value,
        }
    }
}

/// `eth_getTransactionReceipt` result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    /// Transaction hash
    pub transaction_hash: H256,
    /// Status flag (absent on pre-Byzantium nodes)
    #[serde(default, deserialize_with = "quantity::deserialize_opt_u64")]
    pub status: Option<u64>,
    /// Gas consumed
    #[serde(deserialize_with = "quantity::deserialize_u64")]
    pub gas_used: u64,
    /// Created contract
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// Block containing the transaction
    #[serde(default, deserialize_with = "quantity::deserialize_opt_u64")]
    pub block_number: Option<u64>,
    /// Emitted logs
    #[serde(default)]
    pub logs: Vec<RpcLog>,
}

/// Log entry inside an [`RpcReceipt`]
#[derive(Debug, Clone, Deserialize)]
pub struct RpcLog {
    /// Emitting contract
    pub address: Address,
    /// Topics
    #[serde(default)]
    pub topics: Vec<H256>,
    /// Non-indexed data
    #[serde(default, deserialize_with = "quantity::deserialize_bytes")]
    pub data: Bytes,
}

impl RpcLog {
    /// Convert to the shared log type
    pub fn to_log(&self) -> Log {
        Log::new(self.address, self.topics.clone(), self.data.clone())
    }
}
