//! History SDK - client side of the oracle-history and account-history programs
//!
//! This SDK provides:
//! - PDA helpers and instruction builders for both programs
//! - Owned decoders for history accounts fetched over RPC
//! - Provider configuration read from the Anchor environment
//! - A blocking RPC client wrapping the whole instruction set

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod instructions;
pub mod pda;
pub mod region;

pub use client::HistoryClient;
pub use config::{pubkey_from_path, ProviderConfig};
pub use decode::{AccountHistory, Element, OracleHistorySnapshot, RawAccountHistory};
pub use error::SdkError;
pub use instructions::HistoryParams;
pub use pda::{account_history_address, oracle_history_address};
pub use region::DataRegion;

pub use account_history_program;
pub use oracle_history_program;

pub type Result<T> = std::result::Result<T, SdkError>;
