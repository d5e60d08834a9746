//! Program-derived addresses of history accounts

use anchor_lang::prelude::Pubkey;

/// History account recording the prices of `oracle`.
pub fn oracle_history_address(oracle: &Pubkey) -> Pubkey {
    oracle_history_program::OracleHistory::address(oracle).0
}

/// History account derived from the 32-byte `seed` (normally a throwaway signer key).
pub fn account_history_address(seed: &Pubkey) -> Pubkey {
    account_history_program::account_history_address(seed.to_bytes()).0
}
