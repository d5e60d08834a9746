use anchor_lang::prelude::*;
use crate::state::AccountHistoryRaw;

/// Start the close process. No further updates are accepted afterwards.
#[derive(Accounts)]
pub struct InitializeAccountClose<'info> {
    /// The sole authority capable of closing the history account.
    pub close_authority: Signer<'info>,
    /// CHECK: The history account being closed, validated by `AccountHistoryRaw`.
    #[account(mut, owner = crate::ID)]
    pub account_state_history: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<InitializeAccountClose>) -> Result<()> {
    let accounts = &ctx.accounts;
    let mut data = accounts.account_state_history.try_borrow_mut_data()?;
    let mut history = AccountHistoryRaw::from_buffer(&mut data)?;
    history
        .header()
        .check_close_authority(&accounts.close_authority.key())?;
    let slot = history.initiate_close(Clock::get()?.slot)?;

    msg!(
        "Close initiated on {} at slot {}, resolvable from slot {}",
        accounts.account_state_history.key(),
        slot,
        history.header().closable_at().unwrap_or(slot)
    );
    Ok(())
}
