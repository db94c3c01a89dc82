use alloy::primitives::{B256, U256};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

use ledger_client::config::{load_config, ClientConfig};
use ledger_client::observability::init_logging;
use ledger_client::tx::{generate_key, Wallet};
use ledger_client::{Endpoint, LedgerClient};

#[derive(Parser)]
#[command(name = "ledger-cli")]
#[command(about = "Query a ledger node and submit transactions", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Node host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Node JSON-RPC port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new key pair
    Keygen,
    /// Show the next action nonce of an account
    Nonce { account: String },
    /// Show an account's balance of one asset
    Balance {
        account: String,
        #[arg(long, default_value_t = 1)]
        asset: u64,
    },
    /// Show an account record
    Account { account: String },
    /// Show an asset by name or numeric id
    Asset { asset: String },
    /// Show the node's suggested gas price
    GasPrice,
    /// Transfer an asset; the key is read from LEDGER_PRIVATE_KEY
    Transfer {
        from: String,
        to: String,
        amount: U256,
        #[arg(long, default_value_t = 1)]
        asset: u64,
    },
    /// Show the receipt of a transaction
    Receipt { hash: B256 },
    /// Show pool occupancy and waiting transactions
    Txpool,
    /// List connected peers
    Peers,
    /// Show a producer candidate
    Candidate {
        name: String,
        #[arg(long, default_value_t = 0)]
        epoch: u64,
    },
    /// Show consensus parameters
    DposInfo,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(host) = cli.host {
        config.endpoint.host = host;
    }
    if let Some(port) = cli.port {
        config.endpoint.port = port;
    }
    init_logging(&config.observability);

    let client = LedgerClient::from_config(&config);
    let endpoint = Endpoint::from(&config.endpoint);
    tracing::debug!(%endpoint, chain_id = config.chain.id, "Using node");

    match cli.command {
        Commands::Keygen => {
            let (pub_key, wallet) = generate_key()?;
            print_json(&json!({
                "address": wallet.address(),
                "pubKey": pub_key.to_string(),
                "privateKey": wallet.secret_bytes(),
            }))?;
        }
        Commands::Nonce { account } => {
            print_json(&client.rpc()?.get_nonce(&account)?)?;
        }
        Commands::Balance { account, asset } => {
            print_json(&client.rpc()?.get_balance(&account, asset)?)?;
        }
        Commands::Account { account } => {
            print_json(&client.rpc()?.get_account_by_name(&account)?)?;
        }
        Commands::Asset { asset } => {
            let rpc = client.rpc()?;
            let info = match asset.parse::<u64>() {
                Ok(id) => rpc.get_asset_by_id(id)?,
                Err(_) => rpc.get_asset_by_name(&asset)?,
            };
            print_json(&info)?;
        }
        Commands::GasPrice => {
            print_json(&client.rpc()?.gas_price()?)?;
        }
        Commands::Transfer {
            from,
            to,
            amount,
            asset,
        } => {
            let wallet = Wallet::from_env()?;
            let hash = client.transfer(&wallet, from, to, asset, amount)?;
            print_json(&json!({ "hash": hash }))?;
        }
        Commands::Receipt { hash } => {
            print_json(&client.rpc()?.get_receipt(hash)?)?;
        }
        Commands::Txpool => {
            let rpc = client.rpc()?;
            print_json(&json!({
                "status": rpc.txpool_status()?,
                "content": rpc.txpool_inspect()?,
            }))?;
        }
        Commands::Peers => {
            let rpc = client.rpc()?;
            print_json(&json!({
                "count": rpc.peer_count()?,
                "peers": rpc.peers()?,
            }))?;
        }
        Commands::Candidate { name, epoch } => {
            print_json(&client.rpc()?.get_candidate(epoch, &name)?)?;
        }
        Commands::DposInfo => {
            print_json(&client.rpc()?.dpos_info()?)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
