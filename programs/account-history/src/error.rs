//! Account history errors

use anchor_lang::prelude::*;

#[error_code]
pub enum AccountHistoryError {
    #[msg("Cannot update historical data, invalid account")]
    NotCorrectAccount,

    #[msg("Data regions must have non-zero length")]
    InvalidDataRegions,

    #[msg("At most 8 data regions are supported")]
    TooManyDataRegions,

    #[msg("Data region lies outside the watched account's data")]
    DataRegionOutOfBounds,

    #[msg("Capacity must be at least one element")]
    InvalidCapacity,

    #[msg("Cannot add data, not a high enough slot number")]
    NotNewSlot,

    #[msg("Signer provided does not match the update authority")]
    NotUpdateAuthority,

    #[msg("Signer provided does not match the close authority")]
    NotCloseAuthority,

    #[msg("Cannot add data, this account is flagged to be closed")]
    AccountBeingClosed,

    #[msg("Cannot close account, wait period has not elapsed")]
    CannotCloseYet,

    #[msg("Cannot close account, close process not yet initiated")]
    CloseNotInitiated,

    #[msg("Close process already initiated")]
    CloseAlreadyInitiated,

    #[msg("Account is not an account history")]
    InvalidAccountTag,

    #[msg("Account data is too small for its header")]
    AccountTooSmall,

    #[msg("Element type does not match the history's element size")]
    InvalidDataType,

    #[msg("Element size is smaller than its slot prefix")]
    InvalidElementSize,
}
