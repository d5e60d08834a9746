use anchor_lang::prelude::*;
use crate::state::AccountHistoryRaw;

/// Push a new blob of data onto a history account.
#[derive(Accounts)]
pub struct Update<'info> {
    /// Signer performing the update
    pub signer: Signer<'info>,
    /// CHECK: The history account being updated, validated by `AccountHistoryRaw`.
    #[account(mut, owner = crate::ID)]
    pub account_state_history: UncheckedAccount<'info>,
    /// CHECK: The account's data type is not read by this program
    pub watched_account: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<Update>) -> Result<()> {
    let accounts = &ctx.accounts;
    let mut data = accounts.account_state_history.try_borrow_mut_data()?;
    let mut history = AccountHistoryRaw::from_buffer(&mut data)?;
    let header = history.header();
    header.check_update_authority(&accounts.signer.key())?;
    header.check_watched_account(&accounts.watched_account.key())?;
    let slot = Clock::get()?.slot;
    history.push(&accounts.watched_account.try_borrow_data()?, slot)?;

    msg!(
        "Recorded {} at slot {} ({} updates)",
        accounts.watched_account.key(),
        slot,
        history.num_updates()
    );
    Ok(())
}
