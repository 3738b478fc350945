//! Query commands

use clap::Subcommand;
use radius_primitives::H256;
use serde_json::json;

use super::{connect, parse_address};
use crate::{config::Config, output::Output, CliError};

/// Query subcommands
#[derive(Debug, Subcommand)]
pub enum QueryCommand {
    /// Query chain ID
    ChainId,
    /// Query current block number
    BlockNumber,
    /// Query the code deployed at an address
    Code {
        /// Address to query
        address: String,
    },
    /// Query a transaction receipt
    Receipt {
        /// Transaction hash
        hash: String,
    },
}

impl QueryCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            QueryCommand::ChainId => {
                let client = connect(config).await?;
                let chain_id = client.chain_id();
                Output::new(json)
                    .field_u64("chain_id", chain_id)
                    .message(&format!("Chain ID: {}", chain_id))
                    .print();
            }
            QueryCommand::BlockNumber => {
                let client = connect(config).await?;
                let number = client.block_number().await?;
                Output::new(json)
                    .field_u64("block_number", number)
                    .message(&format!("Block number: {}", number))
                    .print();
            }
            QueryCommand::Code { address } => {
                let address = parse_address(&address)?;
                let client = connect(config).await?;
                let code = client.code_at(&address).await?;
                let hex_code = format!("0x{}", hex::encode(&code));
                Output::new(json)
                    .field("address", &address.to_checksum())
                    .field("code", &hex_code)
                    .field_u64("size", code.len() as u64)
                    .message(if code.is_empty() { "No code at address" } else { hex_code.as_str() })
                    .print();
            }
            QueryCommand::Receipt { hash } => {
                let hash =
                    H256::from_hex(&hash).map_err(|e| CliError::InvalidHex(e.to_string()))?;
                let client = connect(config).await?;
                query_receipt(&client, &hash, json).await?;
            }
        }
        Ok(())
    }
}

async fn query_receipt(client: &radius_sdk::Client, hash: &H256, json: bool) -> Result<(), CliError> {
    let Some(receipt) = client.get_transaction_receipt(hash).await? else {
        Output::new(json)
            .field("tx_hash", &hash.to_hex())
            .field_value("receipt", serde_json::Value::Null)
            .message(&format!("Receipt not found for {}", hash))
            .print();
        return Ok(());
    };

    let status = receipt.status.unwrap_or(0);
    Output::new(json)
        .field_value(
            "receipt",
            json!({
                "tx_hash": receipt.transaction_hash.to_hex(),
                "status": status,
                "gas_used": receipt.gas_used,
                "block_number": receipt.block_number,
                "contract_address": receipt.contract_address.map(|a| a.to_hex()),
                "logs": receipt.logs.len(),
            }),
        )
        .message(&format!(
            "Tx hash: {}\nStatus: {}\nBlock: {}\nGas used: {}\nLogs: {}",
            receipt.transaction_hash,
            if status == 1 { "success" } else { "failed" },
            receipt
                .block_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "pending".to_string()),
            receipt.gas_used,
            receipt.logs.len()
        ))
        .print();
    Ok(())
}
