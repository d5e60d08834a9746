//! Owned views of history accounts copied out of RPC buffers

use crate::{Result, SdkError};
use account_history_program::{slot_of, AccountHistoryHeader, RingCursor, SLOT_SIZE};
use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::clock::Slot;
use anchor_lang::Discriminator;
use bytemuck::Pod;
use oracle_history_program::{OracleHistory, OracleType, Price};
use serde::Serialize;
use std::fmt;
use std::mem;

/// Decoded oracle history account.
#[derive(Clone, Copy)]
pub struct OracleHistorySnapshot {
    pub address: Pubkey,
    pub history: OracleHistory,
}

impl fmt::Debug for OracleHistorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleHistorySnapshot")
            .field("address", &self.address)
            .field("associated_oracle", &self.associated_oracle())
            .field("prices", &self.values())
            .finish()
    }
}

impl OracleHistorySnapshot {
    pub fn decode(address: Pubkey, data: &[u8]) -> Result<Self> {
        let invalid = |reason: &str| SdkError::InvalidAccount {
            address,
            reason: reason.to_string(),
        };
        if data.len() < OracleHistory::SPACE {
            return Err(invalid("account is smaller than an oracle history"));
        }
        let (discriminator, body) = data.split_at(OracleHistory::DISCRIMINATOR.len());
        if discriminator != OracleHistory::DISCRIMINATOR {
            return Err(invalid("discriminator mismatch"));
        }
        let history: OracleHistory =
            bytemuck::pod_read_unaligned(&body[..mem::size_of::<OracleHistory>()]);
        Ok(Self { address, history })
    }

    pub fn associated_oracle(&self) -> Pubkey {
        self.history.associated_oracle()
    }

    pub fn oracle_type(&self) -> Result<OracleType> {
        Ok(self.history.oracle_type()?)
    }

    pub fn latest(&self) -> Option<Price> {
        self.history.most_recent().copied()
    }

    /// Recorded prices, newest first.
    pub fn values(&self) -> Vec<Price> {
        self.history.values().copied().collect()
    }
}

/// One recorded element: the slot it was taken at and the captured bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub slot: Slot,
    pub data: Vec<u8>,
}

/// History account decoded without knowing the element layout.
#[derive(Debug, Clone)]
pub struct RawAccountHistory {
    pub address: Pubkey,
    pub header: AccountHistoryHeader,
    /// Newest first
    pub elements: Vec<Element>,
}

impl RawAccountHistory {
    pub fn decode(address: Pubkey, data: &[u8]) -> Result<Self> {
        let header = decode_header(address, data)?;
        let size = header.data_element_size();
        let elements = RingCursor::newest_first(&header)
            .map(|index| {
                let start = AccountHistoryHeader::LEN + index * size;
                let element = &data[start..start + size];
                Element {
                    slot: slot_of(element),
                    data: element[account_history_program::SLOT_SIZE..].to_vec(),
                }
            })
            .collect();
        Ok(Self {
            address,
            header,
            elements,
        })
    }

    pub fn latest(&self) -> Option<&Element> {
        self.elements.first()
    }

    /// Reinterpret every element as `T`, slot prefix included.
    pub fn interpret<T: Pod>(&self) -> Result<AccountHistory<T>> {
        if mem::size_of::<T>() != self.header.data_element_size() {
            return Err(SdkError::InvalidAccount {
                address: self.address,
                reason: format!(
                    "element size is {} bytes, requested type has {}",
                    self.header.data_element_size(),
                    mem::size_of::<T>()
                ),
            });
        }
        let values = self
            .elements
            .iter()
            .map(|element| {
                let mut bytes = element.slot.to_le_bytes().to_vec();
                bytes.extend_from_slice(&element.data);
                bytemuck::pod_read_unaligned(&bytes)
            })
            .collect();
        Ok(AccountHistory {
            address: self.address,
            header: self.header,
            values,
        })
    }
}

/// History account whose elements are `T`.
#[derive(Debug, Clone)]
pub struct AccountHistory<T: Pod> {
    pub address: Pubkey,
    pub header: AccountHistoryHeader,
    values: Vec<T>,
}

impl<T: Pod> AccountHistory<T> {
    pub fn decode(address: Pubkey, data: &[u8]) -> Result<Self> {
        RawAccountHistory::decode(address, data)?.interpret()
    }

    /// Newest first.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn latest(&self) -> Option<&T> {
        self.values.first()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn decode_header(address: Pubkey, data: &[u8]) -> Result<AccountHistoryHeader> {
    let invalid = |reason: &str| SdkError::InvalidAccount {
        address,
        reason: reason.to_string(),
    };
    if data.len() < AccountHistoryHeader::LEN {
        return Err(invalid("account is smaller than a history header"));
    }
    let header: AccountHistoryHeader =
        bytemuck::pod_read_unaligned(&data[..AccountHistoryHeader::LEN]);
    if !header.is_tagged() {
        return Err(invalid("missing account history tag"));
    }
    if header.capacity() == 0 {
        return Err(invalid("zero capacity"));
    }
    if header.data_element_size() < SLOT_SIZE {
        return Err(invalid("element size is smaller than its slot prefix"));
    }
    let needed = header
        .capacity()
        .checked_mul(header.data_element_size())
        .and_then(|len| len.checked_add(AccountHistoryHeader::LEN));
    if needed.map_or(true, |needed| data.len() < needed) {
        return Err(invalid("account is smaller than its capacity"));
    }
    Ok(header)
}
