//! Oracle History - Rolling on-chain price history for oracle accounts
//!
//! One zero-copy history account per oracle, seeded by the oracle address.
//! Anyone can crank a history account to append the oracle's latest price.

use anchor_lang::prelude::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

pub mod error;
pub mod instructions;
pub mod pyth;
pub mod state;
pub mod svec_modulo;

pub use error::*;
pub use instructions::*;
pub use state::*;

#[program]
pub mod oracle_history_program {
    use super::*;

    /// Liveness check, touches no accounts
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        instructions::initialize(ctx)
    }

    /// Create the history account for an oracle and record its first price
    pub fn initialize_oracle_history(ctx: Context<InitializeOracleHistory>) -> Result<()> {
        instructions::initialize_oracle_history(ctx)
    }

    /// Append the oracle's latest price
    pub fn crank(ctx: Context<Crank>) -> Result<()> {
        instructions::crank(ctx)
    }
}
