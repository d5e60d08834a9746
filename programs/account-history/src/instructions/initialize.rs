use anchor_lang::prelude::*;
use crate::state::{AccountHistoryHeader, AccountHistoryRaw};

/// Create a new historical data account, configured
/// to watch a certain account.
#[derive(Accounts)]
#[instruction(capacity: u32, data_regions: Vec<(u32, u32)>)]
pub struct InitializeAccountHistory<'info> {
    /// Funds rent for the new history account and becomes its close authority.
    #[account(mut)]
    pub payer: Signer<'info>,
    /// Signer and entropy seed for the account state history.
    pub seed: Signer<'info>,
    /// CHECK: The history account being created, laid out by `AccountHistoryRaw`.
    #[account(
        init,
        payer = payer,
        space = AccountHistoryRaw::size_of(capacity, &data_regions),
        seeds = [seed.key().as_ref()],
        bump,
        owner = crate::ID,
    )]
    pub account_state_history: UncheckedAccount<'info>,
    /// CHECK: The account's data type is not read by this program
    pub watched_account: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitializeAccountHistory>,
    capacity: u32,
    data_regions: Vec<(u32, u32)>,
    min_slot_delay: u32,
    min_close_delay: u32,
) -> Result<()> {
    let accounts = &ctx.accounts;
    let update_authority = ctx.remaining_accounts.first().map(|info| info.key());
    let header = AccountHistoryHeader::new(
        accounts.watched_account.key(),
        accounts.payer.key(),
        update_authority,
        capacity,
        min_slot_delay,
        min_close_delay,
        &data_regions,
    )?;
    let mut data = accounts.account_state_history.try_borrow_mut_data()?;
    let mut history = AccountHistoryRaw::initialize(&mut data, header)?;
    let slot = Clock::get()?.slot;
    history.push(&accounts.watched_account.try_borrow_data()?, slot)?;

    msg!(
        "Created history {} watching {} (capacity {}, element size {})",
        accounts.account_state_history.key(),
        accounts.watched_account.key(),
        capacity,
        header.data_element_size()
    );
    Ok(())
}
