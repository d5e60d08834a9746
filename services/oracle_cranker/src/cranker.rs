//! Cranking with retries

use anchor_client::ClientError;
use anchor_lang::prelude::Pubkey;
use history_sdk::{HistoryClient, SdkError};
use oracle_history_program::OracleHistoryError;
use solana_sdk::{
    instruction::InstructionError, signature::Signature, transaction::TransactionError,
};
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Result of cranking a single oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrankOutcome {
    Cranked(Signature),
    /// The oracle has not published since the last crank
    Unchanged,
    Failed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundSummary {
    pub cranked: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl fmt::Display for RoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cranked, {} unchanged, {} failed",
            self.cranked, self.unchanged, self.failed
        )
    }
}

impl RoundSummary {
    pub fn record(&mut self, outcome: &CrankOutcome) {
        match outcome {
            CrankOutcome::Cranked(_) => self.cranked += 1,
            CrankOutcome::Unchanged => self.unchanged += 1,
            CrankOutcome::Failed(_) => self.failed += 1,
        }
    }
}

pub struct Cranker<'a> {
    client: &'a HistoryClient,
    max_retries: u32,
}

impl<'a> Cranker<'a> {
    pub fn new(client: &'a HistoryClient, max_retries: u32) -> Self {
        Self {
            client,
            max_retries,
        }
    }

    pub fn crank_all(&self, oracles: &[Pubkey]) -> RoundSummary {
        let mut summary = RoundSummary::default();
        for oracle in oracles {
            let outcome = crank_with_retry(|| self.client.crank(*oracle), self.max_retries, RETRY_DELAY);
            match &outcome {
                CrankOutcome::Cranked(signature) => info!(%oracle, %signature, "Cranked"),
                CrankOutcome::Unchanged => debug!(%oracle, "No new price"),
                CrankOutcome::Failed(reason) => warn!(%oracle, %reason, "Crank failed"),
            }
            summary.record(&outcome);
        }
        summary
    }
}

/// Run `attempt` until it succeeds, reports a stale price, or has been
/// retried `max_retries` times.
pub fn crank_with_retry(
    mut attempt: impl FnMut() -> history_sdk::Result<Signature>,
    max_retries: u32,
    delay: Duration,
) -> CrankOutcome {
    let mut tries = 0;
    loop {
        match attempt() {
            Ok(signature) => return CrankOutcome::Cranked(signature),
            Err(err) if is_not_new_slot(&err) => return CrankOutcome::Unchanged,
            Err(err) if tries >= max_retries => return CrankOutcome::Failed(err.to_string()),
            Err(err) => {
                tries += 1;
                debug!(%err, attempt = tries, "Retrying crank");
                thread::sleep(delay);
            }
        }
    }
}

/// Whether the program rejected the crank because the price slot did not advance.
pub fn is_not_new_slot(err: &SdkError) -> bool {
    let SdkError::AnchorClient(client_error) = err else {
        return false;
    };
    let ClientError::SolanaClientError(rpc_error) = client_error.as_ref() else {
        return false;
    };
    matches!(
        rpc_error.get_transaction_error(),
        Some(TransactionError::InstructionError(_, InstructionError::Custom(code)))
            if code == u32::from(OracleHistoryError::NotNewSlot)
    )
}
