//! Oracle history instructions

use anchor_lang::prelude::*;
use crate::{OracleHistory, OracleType};

/// No-op entry point used to check that the program is deployed and callable
pub fn initialize(_ctx: Context<Initialize>) -> Result<()> {
    msg!("Oracle history program initialized");
    Ok(())
}

/// Create a history account bound to `oracle` and record its first price
pub fn initialize_oracle_history(ctx: Context<InitializeOracleHistory>) -> Result<()> {
    let oracle = ctx.accounts.oracle.key();
    let mut history = ctx.accounts.oracle_history.load_init()?;
    history.setup(oracle, OracleType::Pyth)?;

    let price = history.push(oracle, &ctx.accounts.oracle.try_borrow_data()?)?;

    msg!(
        "Initialized oracle history for {} at slot {} with price {}",
        oracle,
        price.slot,
        price.price
    );
    Ok(())
}

/// Push the oracle's latest price onto its history account
pub fn crank(ctx: Context<Crank>) -> Result<()> {
    let oracle = ctx.accounts.oracle.key();
    let mut history = ctx.accounts.oracle_history.load_mut()?;

    let price = history.push(oracle, &ctx.accounts.oracle.try_borrow_data()?)?;

    msg!("Cranked {}: slot {} price {}", oracle, price.slot, price.price);
    Ok(())
}

// Account contexts

#[derive(Accounts)]
pub struct Initialize {}

#[derive(Accounts)]
pub struct InitializeOracleHistory<'info> {
    /// Funds rent for the new history account
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: The oracle's data layout depends on the oracle type and is
    /// validated when the first price is read.
    pub oracle: UncheckedAccount<'info>,

    #[account(
        init,
        payer = payer,
        space = OracleHistory::SPACE,
        seeds = [oracle.key().as_ref()],
        bump,
    )]
    pub oracle_history: AccountLoader<'info, OracleHistory>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Crank<'info> {
    /// CHECK: Must be the oracle recorded on the history account.
    #[account(address = oracle_history.load()?.associated_oracle())]
    pub oracle: UncheckedAccount<'info>,

    /// The oracle history account being updated
    #[account(
        mut,
        seeds = [oracle.key().as_ref()],
        bump,
    )]
    pub oracle_history: AccountLoader<'info, OracleHistory>,
}
