//! Block-engine relay command line client.
//!
//! ```text
//!   bundle-relay [--config relay.toml] <command>
//!
//!   tip-accounts ─────────┐
//!   pick-tip              │
//!   bundle-status <id..>  ├─▶ BlockEngineClient ──▶ /api/v1/bundles
//!   send-bundle --file    │                         /api/v1/transactions
//!   send-transaction ─────┘           │
//!   simulate-bundle ──────────────────┼──▶ LedgerClient ──▶ validator RPC
//!                                     ▼
//!                              Reconciler (polling)
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::{Parser, Subcommand};
use serde_json::json;
use solana_sdk::transaction::VersionedTransaction;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bundle_relay::auth::AuthKeypair;
use bundle_relay::bundle::assemble;
use bundle_relay::config::loader::load_config_or_default;
use bundle_relay::confirmation::ConfirmationResult;
use bundle_relay::ledger::types::SimulateBundleConfig;
use bundle_relay::ledger::LedgerClient;
use bundle_relay::observability::init_logging;
use bundle_relay::relay::{BlockEngineClient, BundleRelay, InflightStatusSource};
use bundle_relay::{RelaySessionBuilder, StatusSource};

#[derive(Parser)]
#[command(name = "bundle-relay")]
#[command(about = "Submit and track transaction bundles through a block engine", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the relay's tip accounts
    TipAccounts,
    /// Pick one tip account at random
    PickTip,
    /// Show in-flight status of bundles
    BundleStatus {
        #[arg(required = true)]
        bundle_ids: Vec<String>,
    },
    /// Submit a bundle and wait for it to land
    SendBundle {
        /// One base64 transaction per line
        #[arg(short, long)]
        file: PathBuf,
        /// Override the configured deadline
        #[arg(long)]
        deadline_secs: Option<u64>,
    },
    /// Simulate a bundle against the ledger RPC
    SimulateBundle {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Send the first transaction of a file as a single-transaction bundle
    SendTransaction {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long)]
        deadline_secs: Option<u64>,
    },
    /// Print the public key of the configured auth keypair
    Whoami,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config_or_default(cli.config.as_deref())?;
    init_logging(&config.observability)?;

    tracing::debug!(
        relay = %config.relay.url,
        ledger = %config.ledger.rpc_url,
        "Configuration loaded"
    );

    let block_engine = Arc::new(BlockEngineClient::new(&config.relay)?);

    match cli.command {
        Commands::TipAccounts => {
            let accounts = block_engine.get_tip_accounts(None).await?;
            let accounts: Vec<String> = accounts.iter().map(ToString::to_string).collect();
            print_json(&json!(accounts))?;
        }
        Commands::PickTip => {
            let accounts = block_engine.get_tip_accounts(None).await?;
            match bundle_relay::relay::choose_tip_account(&accounts) {
                Some(account) => println!("{}", account),
                None => return Err(bundle_relay::BundleError::NoTipAccounts.into()),
            }
        }
        Commands::BundleStatus { bundle_ids } => {
            let statuses = block_engine
                .get_inflight_bundle_statuses(&bundle_ids, None)
                .await?;
            print_json(&serde_json::to_value(&statuses)?)?;
        }
        Commands::SendBundle {
            file,
            deadline_secs,
        } => {
            let transactions = read_transactions(&file)?;
            let ledger = Arc::new(LedgerClient::new(&config.ledger)?);
            let (session, _refresh_errors) = RelaySessionBuilder::new(
                block_engine.clone(),
                StatusSource::Polling(block_engine),
                ledger,
            )
            .confirmation(config.confirmation.clone())
            .connect()
            .await?;

            let deadline = deadline_secs
                .map(Duration::from_secs)
                .unwrap_or_else(|| session.default_deadline());
            let result = session
                .submit_and_confirm_with_cancel(&transactions, deadline, ctrl_c())
                .await;
            session.close().await;
            print_confirmation(&result?)?;
        }
        Commands::SimulateBundle { file } => {
            let transactions = read_transactions(&file)?;
            let bundle = assemble(&transactions)?;
            let ledger = LedgerClient::new(&config.ledger)?;
            let simulated = ledger
                .simulate_bundle(&bundle, &SimulateBundleConfig::without_accounts(bundle.len()))
                .await?;
            print_json(&serde_json::to_value(&simulated)?)?;
        }
        Commands::SendTransaction {
            file,
            deadline_secs,
        } => {
            let transactions = read_transactions(&file)?;
            let transaction = transactions
                .first()
                .ok_or_else(|| format!("{} contains no transactions", file.display()))?;
            let ledger = Arc::new(LedgerClient::new(&config.ledger)?);
            let (session, _refresh_errors) = RelaySessionBuilder::new(
                block_engine.clone(),
                StatusSource::Polling(block_engine),
                ledger,
            )
            .confirmation(config.confirmation.clone())
            .connect()
            .await?;

            let deadline = deadline_secs
                .map(Duration::from_secs)
                .unwrap_or_else(|| session.default_deadline());
            let result = session.send_transaction_and_confirm(transaction, deadline).await;
            session.close().await;
            print_confirmation(&result?)?;
        }
        Commands::Whoami => {
            let keypair = AuthKeypair::load(config.auth.keypair_path.as_deref().map(Path::new))?;
            println!("{}", keypair.pubkey());
        }
    }

    Ok(())
}

async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::info!("Interrupt received, cancelling confirmation");
}

fn read_transactions(path: &Path) -> Result<Vec<VersionedTransaction>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| -> Result<VersionedTransaction, Box<dyn std::error::Error>> {
            let bytes = STANDARD
                .decode(line)
                .map_err(|e| format!("line {}: invalid base64: {}", index + 1, e))?;
            let tx = bincode::deserialize::<VersionedTransaction>(&bytes)
                .map_err(|e| format!("line {}: invalid transaction: {}", index + 1, e))?;
            Ok(tx)
        })
        .collect()
}

fn print_confirmation(result: &ConfirmationResult) -> Result<(), Box<dyn std::error::Error>> {
    let signatures: Vec<String> = result
        .handle
        .signatures()
        .iter()
        .map(ToString::to_string)
        .collect();
    print_json(&json!({
        "bundle_id": result.handle.relay_bundle_id(),
        "outcome": result.final_outcome.label(),
        "signatures": signatures,
        "statuses": result.statuses,
        "elapsed_ms": result.elapsed.as_millis() as u64,
    }))
}

fn print_json(value: &serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
