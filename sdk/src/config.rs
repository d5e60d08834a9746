//! Provider configuration read from the same environment `anchor test` exports

use crate::{Result, SdkError};
use anchor_client::Cluster;
use anchor_lang::prelude::Pubkey;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{read_keypair_file, Keypair},
    signer::Signer,
};
use std::path::PathBuf;

pub const PROVIDER_URL_ENV: &str = "ANCHOR_PROVIDER_URL";
pub const WALLET_ENV: &str = "ANCHOR_WALLET";
pub const COMMITMENT_ENV: &str = "ANCHOR_COMMITMENT";

pub const DEFAULT_PROVIDER_URL: &str = "http://127.0.0.1:8899";
pub const DEFAULT_WALLET: &str = "~/.config/solana/id.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    /// RPC endpoint of the cluster
    pub url: String,

    /// Keypair file of the paying wallet, tilde already expanded
    pub wallet: PathBuf,

    pub commitment: CommitmentConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PROVIDER_URL.to_string(),
            wallet: expand(DEFAULT_WALLET),
            commitment: CommitmentConfig::confirmed(),
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or empty keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let commitment = match get(COMMITMENT_ENV) {
            Some(level) => parse_commitment(&level)?,
            None => defaults.commitment,
        };

        Ok(Self {
            url: get(PROVIDER_URL_ENV).unwrap_or(defaults.url),
            wallet: get(WALLET_ENV).map_or(defaults.wallet, |path| expand(&path)),
            commitment,
        })
    }

    /// Override the endpoint and wallet, as CLI flags do.
    pub fn with_overrides(mut self, url: Option<String>, wallet: Option<String>) -> Self {
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(wallet) = wallet {
            self.wallet = expand(&wallet);
        }
        self
    }

    pub fn cluster(&self) -> Result<Cluster> {
        self.url
            .parse()
            .map_err(|e| SdkError::Config(format!("invalid provider url {}: {}", self.url, e)))
    }

    pub fn payer(&self) -> Result<Keypair> {
        read_keypair_file(&self.wallet).map_err(|e| SdkError::Wallet {
            path: self.wallet.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Read `arg` as a base58 pubkey, or else as a keypair file and take its pubkey.
pub fn pubkey_from_path(arg: &str) -> Result<Pubkey> {
    if let Ok(pubkey) = arg.parse::<Pubkey>() {
        return Ok(pubkey);
    }
    let path = expand(arg);
    read_keypair_file(&path)
        .map(|keypair| keypair.pubkey())
        .map_err(|e| SdkError::Wallet {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

pub fn parse_commitment(level: &str) -> Result<CommitmentConfig> {
    match level.trim().to_ascii_lowercase().as_str() {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(SdkError::Config(format!("unknown commitment level {other}"))),
    }
}
