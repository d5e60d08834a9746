//! Service configuration

use anyhow::{Context, Result};
use history_sdk::ProviderConfig;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    /// RPC endpoint to connect to
    pub rpc_url: String,

    /// Keypair paying for crank transactions
    pub wallet_path: String,

    /// How often to crank every oracle history (in seconds)
    pub poll_interval_secs: u64,

    /// Maximum retries for a failed crank
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8899".to_string(),
            wallet_path: "~/.config/solana/id.json".to_string(),
            poll_interval_secs: 5,
            max_retries: 3,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Config {
            rpc_url: lookup("RPC_URL").unwrap_or(defaults.rpc_url),

            wallet_path: lookup("WALLET_PATH").unwrap_or(defaults.wallet_path),

            poll_interval_secs: lookup("POLL_INTERVAL")
                .map(|v| v.parse())
                .transpose()
                .context("Invalid POLL_INTERVAL")?
                .unwrap_or(defaults.poll_interval_secs),

            max_retries: lookup("MAX_RETRIES")
                .map(|v| v.parse())
                .transpose()
                .context("Invalid MAX_RETRIES")?
                .unwrap_or(defaults.max_retries),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn provider(&self) -> ProviderConfig {
        ProviderConfig::default()
            .with_overrides(Some(self.rpc_url.clone()), Some(self.wallet_path.clone()))
    }
}
