//! Oracle Cranker Service
//!
//! Periodically pushes the latest price of every oracle that has a history account

pub mod config;
pub mod cranker;
pub mod monitor;

pub use config::Config;
pub use cranker::{CrankOutcome, Cranker, RoundSummary};
pub use monitor::OracleMonitor;

use anyhow::{Context, Result};
use history_sdk::HistoryClient;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

/// Main entry point for the cranker service. Runs until `shutdown` is set.
pub async fn run(config: Config, shutdown: Arc<AtomicBool>) -> Result<()> {
    tokio::task::spawn_blocking(move || run_blocking(&config, &shutdown))
        .await
        .context("Cranker thread panicked")?
}

/// The RPC client is blocking, so the loop lives on its own thread.
fn run_blocking(config: &Config, shutdown: &AtomicBool) -> Result<()> {
    let client = HistoryClient::from_config(&config.provider())
        .context("Failed to create history client")?;
    info!(payer = %client.payer(), "Starting oracle cranker");

    let monitor = OracleMonitor::new(&client);
    let cranker = Cranker::new(&client, config.max_retries);

    while !shutdown.load(Ordering::Relaxed) {
        match monitor.poll_oracles() {
            Ok(oracles) => {
                let summary = cranker.crank_all(&oracles);
                info!(oracles = oracles.len(), %summary, "Round complete");
            }
            Err(e) => {
                error!("Error polling oracle histories: {:#}", e);
            }
        }

        std::thread::sleep(config.poll_interval());
    }

    info!("Oracle cranker stopped");
    Ok(())
}
