use anchor_lang::prelude::*;
use crate::state::AccountHistoryRaw;

/// Finish the close process and reclaim the rent lamports.
#[derive(Accounts)]
pub struct ResolveAccountClose<'info> {
    /// The sole authority capable of closing the history account.
    pub close_authority: Signer<'info>,
    /// Recipient of lamport rent
    #[account(mut)]
    pub rent_recipient: SystemAccount<'info>,
    /// CHECK: The history account being closed, validated by `AccountHistoryRaw`.
    #[account(mut, owner = crate::ID)]
    pub account_state_history: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<ResolveAccountClose>) -> Result<()> {
    let accounts = &ctx.accounts;
    {
        let mut data = accounts.account_state_history.try_borrow_mut_data()?;
        let history = AccountHistoryRaw::from_buffer(&mut data)?;
        let header = history.header();
        header.check_close_authority(&accounts.close_authority.key())?;
        header.check_closable(Clock::get()?.slot)?;
    }

    let history_info = accounts.account_state_history.to_account_info();
    let recipient_info = accounts.rent_recipient.to_account_info();
    let lamports = history_info.lamports();
    let recipient_balance = recipient_info
        .lamports()
        .checked_add(lamports)
        .ok_or(ProgramError::ArithmeticOverflow)?;
    **recipient_info.try_borrow_mut_lamports()? = recipient_balance;
    **history_info.try_borrow_mut_lamports()? = 0;

    history_info.assign(&System::id());
    history_info.realloc(0, false)?;

    msg!(
        "Closed {}, returned {} lamports to {}",
        history_info.key(),
        lamports,
        recipient_info.key()
    );
    Ok(())
}
