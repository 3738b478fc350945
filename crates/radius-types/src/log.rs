//! Event log entries

use bytes::Bytes;
use radius_primitives::{Address, H256};

/// Log entry emitted during transaction execution
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Log {
    /// Contract address that emitted the log
    pub address: Address,
    /// Log topics (indexed parameters)
    pub topics: Vec<H256>,
    /// Log data (non-indexed parameters)
    pub data: Bytes,
}

impl Log {
    /// Create a new log entry
    pub fn new(address: Address, topics: Vec<H256>, data: Bytes) -> Self {
        Self {
            address,
            topics,
            data,
        }
    }

    /// Get the first topic (the event signature for non-anonymous events)
    pub fn topic0(&self) -> Option<&H256> {
        self.topics.first()
    }
}
