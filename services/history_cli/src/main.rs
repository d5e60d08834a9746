//! Account History CLI
//!
//! Take historical snapshots of account data and manage oracle price
//! histories from the command line.

mod report;

use anchor_lang::prelude::Pubkey;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use history_sdk::{DataRegion, HistoryClient, HistoryParams, ProviderConfig};
use report::{AccountHistoryReport, OracleHistoryReport};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "account-history")]
#[command(about = "Record and inspect on-chain account and oracle histories")]
#[command(version)]
struct Cli {
    /// RPC endpoint URL, defaults to ANCHOR_PROVIDER_URL
    #[arg(long, short = 'u', global = true)]
    url: Option<String>,

    /// Path to the paying keypair, defaults to ANCHOR_WALLET
    #[arg(long, short = 'k', global = true)]
    keypair: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new history account
    Initialize {
        /// How many data elements to store
        #[arg(long)]
        capacity: u32,
        /// Minimum elapsed slots between updates. Defaults to 1.
        #[arg(long)]
        min_slot_delay: Option<u32>,
        /// Slots to wait between initiating and resolving a close. Defaults to 0.
        #[arg(long)]
        min_close_delay: Option<u32>,
        /// Only this key may push updates
        #[arg(long)]
        update_authority: Option<Pubkey>,
        /// Account whose data is recorded, as a pubkey or keypair path
        #[arg(value_parser = parse_pubkey_or_path)]
        watched_account: Pubkey,
        /// Byte ranges to record, as OFFSET:LEN
        #[arg(required = true, value_parser = parse_region)]
        data_regions: Vec<DataRegion>,
    },
    /// Record the watched account's current data
    Update { history_account: Pubkey },
    /// Begin closing a history account
    InitClose { history_account: Pubkey },
    /// Finish closing a history account and reclaim its rent
    ResolveClose {
        history_account: Pubkey,
        /// Defaults to the signer
        #[arg(long)]
        rent_recipient: Option<Pubkey>,
    },
    /// Print a history account
    Show {
        history_account: Pubkey,
        #[arg(long)]
        json: bool,
    },
    /// Oracle price histories
    Oracle {
        #[command(subcommand)]
        command: OracleCommands,
    },
    /// Call the oracle-history program's initialize
    Smoke,
}

#[derive(Subcommand, Debug)]
enum OracleCommands {
    /// Create the history account of a Pyth price account
    Init { oracle: Pubkey },
    /// Push the oracle's latest price
    Crank { oracle: Pubkey },
    /// Print the recorded prices
    Show {
        oracle: Pubkey,
        #[arg(long)]
        json: bool,
    },
}

fn parse_pubkey_or_path(s: &str) -> Result<Pubkey, String> {
    history_sdk::pubkey_from_path(s).map_err(|_| format!("Invalid pubkey or path: {s}"))
}

fn parse_region(s: &str) -> Result<DataRegion, String> {
    s.parse().map_err(|e: history_sdk::SdkError| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ProviderConfig::from_env()?.with_overrides(
        cli.url,
        cli.keypair.map(|path| path.display().to_string()),
    );
    let client = HistoryClient::from_config(&config)
        .with_context(|| format!("Failed to connect to {}", config.url))?;

    match cli.command {
        Commands::Initialize {
            capacity,
            min_slot_delay,
            min_close_delay,
            update_authority,
            watched_account,
            data_regions,
        } => {
            let params = HistoryParams {
                capacity,
                data_regions,
                min_slot_delay,
                min_close_delay,
                update_authority,
            };
            let (history, signature) = client
                .initialize_account_history(watched_account, &params)
                .context("Failed to create history account")?;
            println!("Created history account {history} watching {watched_account}");
            println!("{signature}");
        }
        Commands::Update { history_account } => {
            let signature = client.update(history_account).context("Update failed")?;
            println!("{signature}");
        }
        Commands::InitClose { history_account } => {
            println!("Initializing account close procedure on {history_account}");
            let signature = client
                .initialize_account_close(history_account)
                .context("Failed to initiate close")?;
            println!("{signature}");
        }
        Commands::ResolveClose {
            history_account,
            rent_recipient,
        } => {
            println!("Resolving account close procedure on {history_account}");
            let signature = client
                .resolve_account_close(history_account, rent_recipient)
                .context("Failed to resolve close")?;
            println!("{signature}");
        }
        Commands::Show {
            history_account,
            json,
        } => {
            let history = client.fetch_account_history(history_account)?;
            let report = AccountHistoryReport::from(&history);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
        Commands::Oracle { command } => match command {
            OracleCommands::Init { oracle } => {
                let (history, signature) = client
                    .initialize_oracle_history(oracle)
                    .context("Failed to create oracle history")?;
                println!("Created oracle history {history} for {oracle}");
                println!("{signature}");
            }
            OracleCommands::Crank { oracle } => {
                let signature = client.crank(oracle).context("Crank failed")?;
                println!("{signature}");
            }
            OracleCommands::Show { oracle, json } => {
                let snapshot = client.fetch_oracle_history(oracle)?;
                let report = OracleHistoryReport::from(&snapshot);
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{report}");
                }
            }
        },
        Commands::Smoke => {
            let signature = client.initialize()?;
            println!("Your transaction signature {signature}");
        }
    }
    Ok(())
}
