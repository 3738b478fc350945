//! Transaction commands

use std::sync::Arc;

use clap::Subcommand;
use radius_sdk::abi::bytecode_from_hex;
use radius_sdk::{Abi, Contract, Receipt};
use serde_json::Value;

use super::{
    connect, format_wei_to_eth, load_abi, method_inputs, parse_address, parse_eth_to_wei,
    receipt_to_json, token_to_json, tokenize_args, SignerArgs,
};
use crate::{config::Config, output::Output, CliError};

/// Transaction subcommands
#[derive(Debug, Subcommand)]
pub enum TxCommand {
    /// Send ETH to an address
    Send {
        /// Recipient address
        #[arg(short, long)]
        to: String,
        /// Amount to send (in ETH)
        #[arg(short, long)]
        amount: String,
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Deploy a contract
    Deploy {
        /// Contract bytecode (hex)
        #[arg(short, long)]
        bytecode: String,
        /// ABI JSON, inline or a file path; required for constructor arguments
        #[arg(long)]
        abi: Option<String>,
        /// Constructor arguments
        #[arg(long, num_args = 1..)]
        args: Vec<String>,
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Call a read-only contract method
    Call {
        /// Contract address
        #[arg(short, long)]
        contract: String,
        /// ABI JSON, inline or a file path
        #[arg(long)]
        abi: String,
        /// Method name
        #[arg(short, long)]
        method: String,
        /// Method arguments
        #[arg(long, num_args = 1..)]
        args: Vec<String>,
    },
    /// Execute a state-changing contract method
    Execute {
        /// Contract address
        #[arg(short, long)]
        contract: String,
        /// ABI JSON, inline or a file path
        #[arg(long)]
        abi: String,
        /// Method name
        #[arg(short, long)]
        method: String,
        /// Method arguments
        #[arg(long, num_args = 1..)]
        args: Vec<String>,
        #[command(flatten)]
        signer: SignerArgs,
    },
}

impl TxCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            TxCommand::Send { to, amount, signer } => {
                send_tx(config, &to, &amount, &signer, json).await
            }
            TxCommand::Deploy {
                bytecode,
                abi,
                args,
                signer,
            } => deploy_contract(config, &bytecode, abi.as_deref(), &args, &signer, json).await,
            TxCommand::Call {
                contract,
                abi,
                method,
                args,
            } => call_contract(config, &contract, &abi, &method, &args, json).await,
            TxCommand::Execute {
                contract,
                abi,
                method,
                args,
                signer,
            } => execute_contract(config, &contract, &abi, &method, &args, &signer, json).await,
        }
    }
}

fn print_receipt(receipt: &Receipt, headline: &str, json: bool) {
    let mut text = format!(
        "{}\nTx hash: {}\nFrom: {}\nTo: {}\nGas used: {}",
        headline, receipt.tx_hash, receipt.from, receipt.to, receipt.gas_used
    );
    for event in &receipt.logs {
        text.push_str(&format!("\nEvent: {}", event.name));
        for (name, token) in &event.data {
            text.push_str(&format!("\n  {} = {}", name, token_to_json(token)));
        }
    }

    Output::new(json)
        .field_value("receipt", receipt_to_json(receipt))
        .message(&text)
        .print();
}

async fn send_tx(
    config: &Config,
    to: &str,
    amount: &str,
    signer: &SignerArgs,
    json: bool,
) -> Result<(), CliError> {
    let to = parse_address(to)?;
    let value = parse_eth_to_wei(amount)?;

    let client = connect(config).await?;
    let signer = signer.signer(&client, config).await?;
    let receipt = client.send(signer.as_ref(), &to, value).await?;

    print_receipt(
        &receipt,
        &format!("Sent {} ETH to {}", format_wei_to_eth(&value), to),
        json,
    );
    Ok(())
}

async fn deploy_contract(
    config: &Config,
    bytecode: &str,
    abi: Option<&str>,
    args: &[String],
    signer: &SignerArgs,
    json: bool,
) -> Result<(), CliError> {
    let code = bytecode_from_hex(bytecode)
        .ok_or_else(|| CliError::InvalidHex("bytecode must be non-empty hex".to_string()))?;
    let abi = match abi {
        Some(source) => load_abi(source)?,
        None if args.is_empty() => Arc::new(Abi::from_json("[]")?),
        None => {
            return Err(CliError::InvalidInput(
                "constructor arguments need --abi".to_string(),
            ))
        }
    };
    let inputs: Vec<_> = abi
        .contract()
        .constructor()
        .map(|c| c.inputs.iter().map(|p| p.kind.clone()).collect())
        .unwrap_or_default();
    let tokens = tokenize_args(&inputs, args)?;

    let client = connect(config).await?;
    let signer = signer.signer(&client, config).await?;
    let contract = client
        .deploy_contract(signer.as_ref(), &code, abi, &tokens)
        .await?;

    let address = contract.address();
    Output::new(json)
        .field("contract_address", &address.to_checksum())
        .field("deployer", &signer.address().to_checksum())
        .message(&format!("Contract deployed at {}", address))
        .print();
    Ok(())
}

async fn call_contract(
    config: &Config,
    contract: &str,
    abi: &str,
    method: &str,
    args: &[String],
    json: bool,
) -> Result<(), CliError> {
    let abi = load_abi(abi)?;
    let tokens = tokenize_args(&method_inputs(&abi, method)?, args)?;
    let contract = Contract::new(parse_address(contract)?, abi);

    let client = connect(config).await?;
    let output = contract.call(&client, method, &tokens).await?;
    let values: Vec<Value> = output.iter().map(token_to_json).collect();

    let text = values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    Output::new(json)
        .field("method", method)
        .field_value("result", Value::Array(values))
        .message(&text)
        .print();
    Ok(())
}

async fn execute_contract(
    config: &Config,
    contract: &str,
    abi: &str,
    method: &str,
    args: &[String],
    signer: &SignerArgs,
    json: bool,
) -> Result<(), CliError> {
    let abi = load_abi(abi)?;
    let tokens = tokenize_args(&method_inputs(&abi, method)?, args)?;
    let contract = Contract::new(parse_address(contract)?, abi);

    let client = connect(config).await?;
    let signer = signer.signer(&client, config).await?;
    let receipt = contract
        .execute(&client, signer.as_ref(), method, &tokens)
        .await?;

    print_receipt(&receipt, &format!("Executed {}", method), json);
    Ok(())
}
