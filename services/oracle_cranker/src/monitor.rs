//! Discovery of oracle history accounts

use anyhow::{Context, Result};
use anchor_lang::prelude::Pubkey;
use history_sdk::HistoryClient;
use tracing::debug;

pub struct OracleMonitor<'a> {
    client: &'a HistoryClient,
}

impl<'a> OracleMonitor<'a> {
    pub fn new(client: &'a HistoryClient) -> Self {
        Self { client }
    }

    /// Oracles that currently have a history account, in a stable order.
    pub fn poll_oracles(&self) -> Result<Vec<Pubkey>> {
        let histories = self
            .client
            .oracle_histories()
            .context("Failed to list oracle histories")?;

        let mut oracles: Vec<Pubkey> = histories
            .iter()
            .map(|history| history.associated_oracle())
            .collect();
        oracles.sort();
        oracles.dedup();

        debug!(count = oracles.len(), "Polled oracle histories");
        Ok(oracles)
    }
}
