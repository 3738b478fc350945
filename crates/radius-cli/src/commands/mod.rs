//! Subcommands and the helpers they share

pub mod account;
pub mod query;
pub mod tx;

use std::sync::Arc;

use clap::Args;
use ethabi::token::{LenientTokenizer, Tokenizer};
use ethabi::ParamType;
use radius_primitives::{Address, U256};
use radius_sdk::{Abi, ClefSigner, Client, PrivateKeySigner, Receipt, Signer, Token};
use serde_json::{json, Value};

use crate::{config::Config, CliError};

const WEI_PER_ETH: u64 = 1_000_000_000_000_000_000;

/// How a command obtains its signer
#[derive(Debug, Clone, Args)]
pub struct SignerArgs {
    /// Private key (hex)
    #[arg(short, long, env = "RADIUS_PRIVATE_KEY", hide_env_values = true)]
    pub key: Option<String>,
    /// Sign through the configured Clef endpoint as this address
    #[arg(long)]
    pub from: Option<String>,
}

impl SignerArgs {
    /// Build the signer; chain ID comes from `client`
    pub async fn signer(&self, client: &Client, config: &Config) -> Result<Box<dyn Signer>, CliError> {
        if let Some(from) = &self.from {
            let clef_url = config.clef_url.as_deref().ok_or_else(|| {
                CliError::Config("--from needs a Clef endpoint, set one with `radius config --set-clef`".to_string())
            })?;
            let signer = ClefSigner::connect(parse_address(from)?, client, clef_url).await?;
            return Ok(Box::new(signer));
        }

        let key = self
            .key
            .as_deref()
            .ok_or_else(|| CliError::InvalidKey("pass --key or set RADIUS_PRIVATE_KEY".to_string()))?;
        let key = radius_crypto::private_key_from_hex(key).map_err(|e| CliError::InvalidKey(e.to_string()))?;
        Ok(Box::new(PrivateKeySigner::connect(key, client).await))
    }
}

/// Connect to the configured node
pub async fn connect(config: &Config) -> Result<Client, CliError> {
    tracing::debug!(url = %config.rpc_url, "connecting");
    Ok(Client::connect_with_options(&config.rpc_url, config.client_options()).await?)
}

pub fn parse_address(s: &str) -> Result<Address, CliError> {
    Address::from_hex(s).map_err(|e| CliError::InvalidAddress(e.to_string()))
}

/// Parse a decimal ETH amount ("1", "0.5") into wei
pub fn parse_eth_to_wei(eth_str: &str) -> Result<U256, CliError> {
    let invalid = || CliError::InvalidAmount(format!("'{}' is not a valid ETH amount", eth_str));

    let (whole, fraction) = match eth_str.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (eth_str, ""),
    };
    if (whole.is_empty() && fraction.is_empty()) || fraction.len() > 18 {
        return Err(invalid());
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole).map_err(|_| invalid())?
    };
    let fraction = if fraction.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(&format!("{:0<18}", fraction)).map_err(|_| invalid())?
    };

    whole
        .checked_mul(U256::from(WEI_PER_ETH))
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(invalid)
}

/// Format wei as ETH, keeping at most six decimals
pub fn format_wei_to_eth(wei: &U256) -> String {
    let divisor = U256::from(WEI_PER_ETH);
    let eth = *wei / divisor;
    let remainder = *wei % divisor;

    if remainder.is_zero() {
        return eth.to_string();
    }
    let remainder_str = format!("{:0>18}", remainder.to_string());
    let trimmed = remainder_str.trim_end_matches('0');
    let decimals = trimmed[..trimmed.len().min(6)].trim_end_matches('0');
    if decimals.is_empty() {
        eth.to_string()
    } else {
        format!("{}.{}", eth, decimals)
    }
}

/// Parse an ABI given inline or as a path to a JSON file
pub fn load_abi(source: &str) -> Result<Arc<Abi>, CliError> {
    let trimmed = source.trim_start();
    let json = if trimmed.starts_with('[') || trimmed.starts_with('{') {
        source.to_string()
    } else {
        std::fs::read_to_string(source)?
    };
    Ok(Arc::new(Abi::from_json(&json)?))
}

/// Parse textual arguments against parameter types
pub fn tokenize_args(types: &[ParamType], args: &[String]) -> Result<Vec<Token>, CliError> {
    if types.len() != args.len() {
        return Err(CliError::InvalidInput(format!(
            "expected {} argument(s), got {}",
            types.len(),
            args.len()
        )));
    }
    types
        .iter()
        .zip(args)
        .map(|(kind, arg)| {
            let value = match kind {
                ParamType::Address | ParamType::Bytes | ParamType::FixedBytes(_) => {
                    arg.strip_prefix("0x").unwrap_or(arg.as_str())
                }
                _ => arg.as_str(),
            };
            LenientTokenizer::tokenize(kind, value)
                .map_err(|e| CliError::InvalidInput(format!("argument '{}' as {}: {}", arg, kind, e)))
        })
        .collect()
}

/// Input types of `method`
pub fn method_inputs(abi: &Abi, method: &str) -> Result<Vec<ParamType>, CliError> {
    let function = abi
        .contract()
        .function(method)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    Ok(function.inputs.iter().map(|p| p.kind.clone()).collect())
}

/// Render a token the way a user would type it
pub fn token_to_json(token: &Token) -> Value {
    match token {
        Token::Address(a) => json!(format!("0x{}", hex::encode(a.as_bytes()))),
        Token::Bytes(b) | Token::FixedBytes(b) => json!(format!("0x{}", hex::encode(b))),
        Token::Int(i) | Token::Uint(i) => json!(i.to_string()),
        Token::Bool(b) => json!(b),
        Token::String(s) => json!(s),
        Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => {
            Value::Array(items.iter().map(token_to_json).collect())
        }
    }
}

pub fn receipt_to_json(receipt: &Receipt) -> Value {
    let logs: Vec<Value> = receipt
        .logs
        .iter()
        .map(|event| {
            let data: serde_json::Map<String, Value> = event
                .data
                .iter()
                .map(|(name, token)| (name.clone(), token_to_json(token)))
                .collect();
            json!({"name": event.name, "data": data})
        })
        .collect();

    json!({
        "tx_hash": receipt.tx_hash.to_hex(),
        "from": receipt.from.to_hex(),
        "to": receipt.to.to_hex(),
        "contract_address": receipt.contract_address.map(|a| a.to_hex()),
        "gas_used": receipt.gas_used,
        "status": receipt.status,
        "value": receipt.value.to_string(),
        "logs": logs,
    })
}
