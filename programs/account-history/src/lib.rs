//! Records slot-stamped snapshots of selected byte ranges of another
//! account into a fixed-capacity ring stored on a history account.

use anchor_lang::prelude::*;

declare_id!("Ad3TZzUh395yaEzot4csGs4YTioX2wX66Gf99XbkvXDR");

pub mod error;
pub mod instructions;
pub mod state;

pub use error::*;
pub use instructions::*;
pub use state::*;

/// Update frequency when none is given at creation.
pub const DEFAULT_MIN_SLOT_DELAY: u32 = 1;
/// Close delay when none is given at creation.
pub const DEFAULT_MIN_CLOSE_DELAY: u32 = 0;

#[program]
pub mod account_history_program {
    use super::*;

    /// Create a history account watching `watched_account`. An optional
    /// first remaining account becomes the update authority.
    pub fn initialize_account_history(
        ctx: Context<InitializeAccountHistory>,
        capacity: u32,
        data_regions: Vec<(u32, u32)>,
        min_slot_delay: Option<u32>,
        min_close_delay: Option<u32>,
    ) -> Result<()> {
        instructions::initialize::handler(
            ctx,
            capacity,
            data_regions,
            min_slot_delay.unwrap_or(DEFAULT_MIN_SLOT_DELAY),
            min_close_delay.unwrap_or(DEFAULT_MIN_CLOSE_DELAY),
        )
    }

    /// Record the watched account's current regions
    pub fn update(ctx: Context<Update>) -> Result<()> {
        instructions::update::handler(ctx)
    }

    pub fn initialize_account_close(ctx: Context<InitializeAccountClose>) -> Result<()> {
        instructions::initialize_account_close::handler(ctx)
    }

    pub fn resolve_account_close(ctx: Context<ResolveAccountClose>) -> Result<()> {
        instructions::resolve_account_close::handler(ctx)
    }
}
