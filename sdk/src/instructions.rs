//! Instruction builders for both history programs

use crate::pda::{account_history_address, oracle_history_address};
use crate::region::DataRegion;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::{system_program, InstructionData};
use serde::{Deserialize, Serialize};

/// Creation parameters of an account history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryParams {
    /// Number of elements kept before the oldest is overwritten
    pub capacity: u32,
    pub data_regions: Vec<DataRegion>,
    /// Program default applies when unset
    pub min_slot_delay: Option<u32>,
    /// Program default applies when unset
    pub min_close_delay: Option<u32>,
    /// When set, only this key may sign updates
    pub update_authority: Option<Pubkey>,
}

impl HistoryParams {
    pub fn new(capacity: u32, data_regions: Vec<DataRegion>) -> Self {
        Self {
            capacity,
            data_regions,
            min_slot_delay: None,
            min_close_delay: None,
            update_authority: None,
        }
    }

    /// Account space the history needs, header included.
    pub fn space(&self) -> usize {
        account_history_program::AccountHistoryRaw::size_of(
            self.capacity,
            &DataRegion::to_pairs(&self.data_regions),
        )
    }
}

/// The oracle-history program's no-op `initialize`.
pub fn initialize() -> Instruction {
    Instruction {
        program_id: oracle_history_program::ID,
        accounts: oracle_history_program::accounts::Initialize {}.to_account_metas(None),
        data: oracle_history_program::instruction::Initialize {}.data(),
    }
}

pub fn initialize_oracle_history(payer: Pubkey, oracle: Pubkey) -> Instruction {
    Instruction {
        program_id: oracle_history_program::ID,
        accounts: oracle_history_program::accounts::InitializeOracleHistory {
            payer,
            oracle,
            oracle_history: oracle_history_address(&oracle),
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: oracle_history_program::instruction::InitializeOracleHistory {}.data(),
    }
}

pub fn crank(oracle: Pubkey) -> Instruction {
    Instruction {
        program_id: oracle_history_program::ID,
        accounts: oracle_history_program::accounts::Crank {
            oracle,
            oracle_history: oracle_history_address(&oracle),
        }
        .to_account_metas(None),
        data: oracle_history_program::instruction::Crank {}.data(),
    }
}

/// `seed` must sign the transaction; the history lives at
/// [`account_history_address`] of it.
pub fn initialize_account_history(
    payer: Pubkey,
    seed: Pubkey,
    watched_account: Pubkey,
    params: &HistoryParams,
) -> Instruction {
    let mut accounts = account_history_program::accounts::InitializeAccountHistory {
        payer,
        seed,
        account_state_history: account_history_address(&seed),
        watched_account,
        system_program: system_program::ID,
    }
    .to_account_metas(None);
    if let Some(authority) = params.update_authority {
        accounts.push(AccountMeta::new_readonly(authority, false));
    }

    Instruction {
        program_id: account_history_program::ID,
        accounts,
        data: account_history_program::instruction::InitializeAccountHistory {
            capacity: params.capacity,
            data_regions: DataRegion::to_pairs(&params.data_regions),
            min_slot_delay: params.min_slot_delay,
            min_close_delay: params.min_close_delay,
        }
        .data(),
    }
}

pub fn update(signer: Pubkey, history: Pubkey, watched_account: Pubkey) -> Instruction {
    Instruction {
        program_id: account_history_program::ID,
        accounts: account_history_program::accounts::Update {
            signer,
            account_state_history: history,
            watched_account,
        }
        .to_account_metas(None),
        data: account_history_program::instruction::Update {}.data(),
    }
}

pub fn initialize_account_close(close_authority: Pubkey, history: Pubkey) -> Instruction {
    Instruction {
        program_id: account_history_program::ID,
        accounts: account_history_program::accounts::InitializeAccountClose {
            close_authority,
            account_state_history: history,
        }
        .to_account_metas(None),
        data: account_history_program::instruction::InitializeAccountClose {}.data(),
    }
}

pub fn resolve_account_close(
    close_authority: Pubkey,
    history: Pubkey,
    rent_recipient: Pubkey,
) -> Instruction {
    Instruction {
        program_id: account_history_program::ID,
        accounts: account_history_program::accounts::ResolveAccountClose {
            close_authority,
            rent_recipient,
            account_state_history: history,
        }
        .to_account_metas(None),
        data: account_history_program::instruction::ResolveAccountClose {}.data(),
    }
}
