//! # radius-sdk
//!
//! Rust SDK for the Radius EVM platform.
//!
//! ## Features
//!
//! - **Client**: queries, contract calls, deployment and transaction submission
//! - **Signer**: pluggable signing (local key, Clef, or your own backend)
//! - **Account**: an address with an optional signer
//! - **Contract**: an address paired with a shared ABI
//! - **ClientOptions**: HTTP client, request logging and response interception
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use radius_sdk::{abi::Token, Abi, Account, Client, Contract, PrivateKeySigner, Signer};
//! use radius_sdk::{Address, U256};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::connect("http://localhost:8545").await?;
//!
//!     let key = radius_crypto::private_key_from_hex(&std::env::var("RADIUS_PRIVATE_KEY")?)?;
//!     let signer = PrivateKeySigner::connect(key, &client).await;
//!     let account = Account::with_signer(Arc::new(signer));
//!     println!("balance: {}", account.balance(&client).await?);
//!
//!     // Transfer 1 wei
//!     let to: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse()?;
//!     let receipt = account.send(&client, &to, U256::one()).await?;
//!     println!("mined {}", receipt.tx_hash);
//!
//!     // Read a contract
//!     let abi = Arc::new(Abi::from_json(r#"[{"type":"function","name":"get","inputs":[],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"}]"#)?);
//!     let contract = Contract::new(to, abi);
//!     let value: Vec<Token> = contract.call(&client, "get", &[]).await?;
//!     println!("get() = {:?}", value);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod account;
mod client;
pub mod contract;
mod error;
pub mod interceptor;
mod options;
mod prepare;
mod quantity;
pub mod receipt;
pub mod signer;
mod transport;
pub mod types;

// Re-export main types
pub use abi::{Abi, Token};
pub use account::Account;
pub use client::Client;
pub use contract::Contract;
pub use error::SdkError;
pub use interceptor::{InterceptedResponse, Interceptor, Logger};
pub use options::{ClientOptions, DEFAULT_POLL_INTERVAL, DEFAULT_RECEIPT_TIMEOUT};
pub use prepare::{apply_gas_margin, TxParams, MAX_GAS};
pub use receipt::{Event, Receipt};
pub use signer::{ClefSigner, PrivateKeySigner, Signer, SignerClient};
pub use transport::{HttpTransport, MockTransport, Transport};

// Re-export primitives for convenience
pub use radius_primitives::{Address, Gas, Nonce, H256, U256};
pub use radius_types::{SignedTransaction, Transaction, TxSignature};
