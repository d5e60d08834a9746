//! Oracle history errors

use anchor_lang::prelude::*;

#[error_code]
pub enum OracleHistoryError {
    #[msg("Invalid Oracle Address")]
    InvalidOracleAddress,

    #[msg("Invalid Pyth Oracle Data")]
    InvalidOracleDataPyth,

    #[msg("Cannot add price, not a higher slot number")]
    NotNewSlot,

    #[msg("Oracle History already initialized")]
    AlreadyInitialized,

    #[msg("Unknown oracle type")]
    UnknownOracleType,
}
