//! Account commands

use clap::Subcommand;
use radius_sdk::{PrivateKeySigner, Signer};

use super::{connect, format_wei_to_eth, parse_address};
use crate::{config::Config, output::Output, CliError};

/// Account subcommands
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Generate a new key pair
    Create,
    /// Show the address of a private key
    Address {
        /// Private key (hex)
        #[arg(short, long, env = "RADIUS_PRIVATE_KEY", hide_env_values = true)]
        key: String,
    },
    /// Get balance of an address
    Balance {
        /// Address to query
        address: String,
    },
    /// Get the pending nonce of an address
    Nonce {
        /// Address to query
        address: String,
    },
    /// Sign a personal message (EIP-191)
    Sign {
        /// Private key (hex)
        #[arg(short, long, env = "RADIUS_PRIVATE_KEY", hide_env_values = true)]
        key: String,
        /// Message text
        #[arg(short, long)]
        message: String,
    },
}

impl AccountCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            AccountCommand::Create => create_account(json),
            AccountCommand::Address { key } => show_address(&key, json),
            AccountCommand::Balance { address } => get_balance(config, &address, json).await,
            AccountCommand::Nonce { address } => get_nonce(config, &address, json).await,
            AccountCommand::Sign { key, message } => sign_message(&key, &message, json).await,
        }
    }
}

fn local_signer(key: &str) -> Result<PrivateKeySigner, CliError> {
    // chain id only matters for transactions
    PrivateKeySigner::from_hex(key, 0).map_err(|e| CliError::InvalidKey(e.to_string()))
}

fn create_account(json: bool) -> Result<(), CliError> {
    let signer = PrivateKeySigner::random(0);
    let address = signer.address();

    Output::new(json)
        .field("address", &address.to_checksum())
        .field("private_key", &signer.private_key_hex())
        .message(&format!(
            "Created new account: {}\nPrivate key: {}",
            address,
            signer.private_key_hex()
        ))
        .print();

    if !json {
        println!("\nWARNING: Save your private key securely. It cannot be recovered!");
    }
    Ok(())
}

fn show_address(key: &str, json: bool) -> Result<(), CliError> {
    let address = local_signer(key)?.address();
    Output::new(json)
        .field("address", &address.to_checksum())
        .message(&address.to_checksum())
        .print();
    Ok(())
}

async fn get_balance(config: &Config, address: &str, json: bool) -> Result<(), CliError> {
    let address = parse_address(address)?;
    let client = connect(config).await?;
    let balance = client.balance_at(&address).await?;
    let eth = format_wei_to_eth(&balance);

    Output::new(json)
        .field("address", &address.to_checksum())
        .field("balance_wei", &balance.to_string())
        .field("balance_eth", &eth)
        .message(&format!("Balance: {} ETH ({} wei)", eth, balance))
        .print();
    Ok(())
}

async fn get_nonce(config: &Config, address: &str, json: bool) -> Result<(), CliError> {
    let address = parse_address(address)?;
    let client = connect(config).await?;
    let nonce = client.pending_nonce_at(&address).await?;

    Output::new(json)
        .field("address", &address.to_checksum())
        .field_u64("nonce", nonce)
        .message(&format!("Nonce: {}", nonce))
        .print();
    Ok(())
}

async fn sign_message(key: &str, message: &str, json: bool) -> Result<(), CliError> {
    let signer = local_signer(key)?;
    let signature = signer.sign_message(message.as_bytes()).await?;
    let signature = format!("0x{}", hex::encode(signature));

    Output::new(json)
        .field("address", &signer.address().to_checksum())
        .field("message", message)
        .field("signature", &signature)
        .message(&signature)
        .print();
    Ok(())
}
