// Common utilities for history program tests
use account_history_program::{AccountHistoryHeader, AccountHistoryRaw};
use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};
use oracle_history_program::pyth::{
    PriceAccountHeader, ACCOUNT_TYPE_PRICE, MAGIC, PRICE_ACCOUNT_LEN, VERSION_2,
};

/// Clock sysvar regions: `slot` and `unix_timestamp`.
pub const CLOCK_REGIONS: [(u32, u32); 2] = [(0, 8), (32, 8)];

/// Element recorded from [`CLOCK_REGIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct ClockSample {
    pub recorded_slot: u64,
    pub clock_slot: u64,
    pub unix_timestamp: i64,
}

/// Common test setup
pub struct TestContext {
    pub payer: Pubkey,
    pub update_authority: Pubkey,
    pub watched: Pubkey,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            payer: Pubkey::new_unique(),
            update_authority: Pubkey::new_unique(),
            watched: Pubkey::new_unique(),
        }
    }

    /// Zeroed account data with a freshly initialized history header.
    pub fn history(
        &self,
        capacity: u32,
        update_authority: Option<Pubkey>,
        min_slot_delay: u32,
        min_close_delay: u32,
    ) -> Vec<u8> {
        let header = AccountHistoryHeader::new(
            self.watched,
            self.payer,
            update_authority,
            capacity,
            min_slot_delay,
            min_close_delay,
            &CLOCK_REGIONS,
        )
        .unwrap();
        let mut data = vec![0u8; AccountHistoryRaw::size_of(capacity, &CLOCK_REGIONS)];
        AccountHistoryRaw::initialize(&mut data, header).unwrap();
        data
    }
}

/// Bytes laid out like the Clock sysvar.
pub fn clock_bytes(slot: u64, unix_timestamp: i64) -> Vec<u8> {
    let mut data = Vec::with_capacity(40);
    data.extend_from_slice(&slot.to_le_bytes());
    data.extend_from_slice(&0i64.to_le_bytes());
    data.extend_from_slice(&0u64.to_le_bytes());
    data.extend_from_slice(&0u64.to_le_bytes());
    data.extend_from_slice(&unix_timestamp.to_le_bytes());
    data
}

/// Pyth v2 price account with no publishers.
pub fn pyth_price(price: i64, slot: u64) -> Vec<u8> {
    let account = PriceAccountHeader {
        magic: MAGIC,
        ver: VERSION_2,
        atype: ACCOUNT_TYPE_PRICE,
        size: PRICE_ACCOUNT_LEN as u32,
        prev_price: price,
        prev_slot: slot,
        ..Default::default()
    };
    let mut data = bytemuck::bytes_of(&account).to_vec();
    data.resize(PRICE_ACCOUNT_LEN, 0);
    data
}
