//! Minimal reader for Pyth v2 price accounts
//!
//! Only the fixed-size prefix of the account is modelled. Publisher
//! components that follow `agg` are never read by this program.

use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

pub const MAGIC: u32 = 0xa1b2_c3d4;
pub const VERSION_2: u32 = 2;
pub const ACCOUNT_TYPE_PRICE: u32 = 3;
/// Size of a complete v2 price account, publisher components included.
pub const PRICE_ACCOUNT_LEN: usize = 3312;

/// Weighted average with a numerator and denominator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Rational {
    pub val: i64,
    pub numer: i64,
    pub denom: i64,
}

/// Aggregate price as last published.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct PriceInfo {
    pub price: i64,
    pub conf: u64,
    pub status: u32,
    pub corp_act: u32,
    pub pub_slot: u64,
}

/// Fixed prefix of a Pyth v2 price account.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct PriceAccountHeader {
    pub magic: u32,
    pub ver: u32,
    pub atype: u32,
    pub size: u32,
    pub ptype: u32,
    pub expo: i32,
    pub num: u32,
    pub num_qt: u32,
    pub last_slot: u64,
    pub valid_slot: u64,
    pub ema_price: Rational,
    pub ema_conf: Rational,
    pub timestamp: i64,
    pub min_pub: u8,
    pub drv2: u8,
    pub drv3: u16,
    pub drv4: u32,
    pub prod: Pubkey,
    pub next: Pubkey,
    pub prev_slot: u64,
    pub prev_price: i64,
    pub prev_conf: u64,
    pub prev_timestamp: i64,
    pub agg: PriceInfo,
}

impl PriceAccountHeader {
    pub const LEN: usize = std::mem::size_of::<Self>();

    pub fn is_valid(&self) -> bool {
        self.magic == MAGIC && self.ver == VERSION_2 && self.atype == ACCOUNT_TYPE_PRICE
    }
}

/// Read the price account prefix out of raw account data.
///
/// Returns `None` when the data is shorter than a full v2 price account, is
/// shorter than the size the header records, or the header does not describe
/// a v2 price account. The read is unaligned.
pub fn load_price_account(data: &[u8]) -> Option<PriceAccountHeader> {
    if data.len() < PRICE_ACCOUNT_LEN {
        return None;
    }
    let header: PriceAccountHeader =
        bytemuck::pod_read_unaligned(&data[..PriceAccountHeader::LEN]);
    (header.is_valid() && header.size as usize <= data.len()).then_some(header)
}


#[cfg(test)]
pub(crate) use tests::mock_price_account;
