//! # radius-cli
//!
//! Command-line interface for the Radius EVM platform.
//!
//! ## Usage
//!
//! ```bash
//! # Account commands
//! radius account create
//! radius account balance 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed
//! radius account sign --key 0x... --message "hello"
//!
//! # Transaction commands
//! radius tx send --to 0x... --amount 0.5 --key 0x...
//! radius tx deploy --bytecode 0x6080... --abi Storage.json --args 42 --key 0x...
//! radius tx call --contract 0x... --abi Storage.json --method get
//! radius tx execute --contract 0x... --abi Storage.json --method set --args 7 --key 0x...
//!
//! # Query commands
//! radius query chain-id
//! radius query receipt 0x...
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Radius CLI
#[derive(Parser, Debug)]
#[command(name = "radius")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// RPC endpoint URL
    #[arg(long, global = true, env = "RADIUS_RPC_URL")]
    rpc_url: Option<String>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Account management
    #[command(subcommand)]
    Account(commands::account::AccountCommand),
    /// Transaction operations
    #[command(subcommand)]
    Tx(commands::tx::TxCommand),
    /// Query chain state
    #[command(subcommand)]
    Query(commands::query::QueryCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set RPC URL
        #[arg(long)]
        set_rpc: Option<String>,
        /// Set Clef URL
        #[arg(long)]
        set_clef: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // logs go to stderr so --json output stays parseable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = Config::load();
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }

    let result = match cli.command {
        Commands::Account(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Tx(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Query(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Config {
            show,
            set_rpc,
            set_clef,
        } => handle_config(&mut config, show, set_rpc, set_clef, cli.json),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        if cli.json {
            let mut body = serde_json::json!({
                "error": e.to_string(),
                "success": false
            });
            if let Some(hash) = tx_hash(&e) {
                body["tx_hash"] = serde_json::Value::String(hash);
            }
            println!("{}", body);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn tx_hash(error: &CliError) -> Option<String> {
    match error {
        CliError::Sdk(e) => e.tx_hash().map(|h| h.to_hex()),
        _ => None,
    }
}

fn handle_config(
    config: &mut Config,
    show: bool,
    set_rpc: Option<String>,
    set_clef: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(rpc) = set_rpc {
        config.rpc_url = rpc;
        modified = true;
    }

    if let Some(clef) = set_clef {
        config.clef_url = Some(clef);
        modified = true;
    }

    if modified {
        let path = config.save()?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &path.display().to_string())
            .message(&format!("Configuration saved to {}", path.display()))
            .print();
    } else if show {
        let clef = config.clef_url.clone().unwrap_or_default();
        Output::new(json)
            .field("rpc_url", &config.rpc_url)
            .field_u64("receipt_timeout_secs", config.receipt_timeout_secs)
            .field_u64("poll_interval_ms", config.poll_interval_ms)
            .field("clef_url", &clef)
            .message(&format!(
                "RPC URL: {}\nReceipt timeout: {}s\nPoll interval: {}ms\nClef URL: {}",
                config.rpc_url,
                config.receipt_timeout_secs,
                config.poll_interval_ms,
                if clef.is_empty() { "(none)" } else { clef.as_str() }
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-rpc/--set-clef to modify")
            .print();
    }

    Ok(())
}
