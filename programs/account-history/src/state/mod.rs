pub mod interpreted;

use crate::error::AccountHistoryError;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::clock::Slot;
use bytemuck::{Pod, Zeroable};
use std::mem;
use std::ops::Index;

/// Equivalent to `SHA256(b"account:AccountHistory")[0..8]`
pub const ACCOUNT_HISTORY_TAG: [u8; 8] = [242, 155, 38, 23, 9, 248, 25, 205];

/// Each element starts with the little-endian slot it was recorded at.
pub const SLOT_SIZE: usize = mem::size_of::<Slot>();

/// Maximum number of `(offset, len)` pairs a history can capture.
pub const MAX_DATA_REGIONS: usize = 8;

/// PDA generation just takes a random 32-byte seed.
pub fn account_history_address(seed: [u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seed.as_ref()], &crate::ID)
}

/// Validate `(offset, len)` pairs and pack them into the header layout.
///
/// Between one and [`MAX_DATA_REGIONS`] pairs are accepted and every pair
/// must have a non-zero length.
pub fn sanitize_data_regions(pairs: &[(u32, u32)]) -> Result<[u32; 16]> {
    require!(!pairs.is_empty(), AccountHistoryError::InvalidDataRegions);
    require!(
        pairs.len() <= MAX_DATA_REGIONS,
        AccountHistoryError::TooManyDataRegions
    );
    let mut packed = [0u32; 16];
    for (i, &(offset, len)) in pairs.iter().enumerate() {
        require!(len != 0, AccountHistoryError::InvalidDataRegions);
        require!(
            offset.checked_add(len).is_some(),
            AccountHistoryError::DataRegionOutOfBounds
        );
        packed[2 * i] = offset;
        packed[2 * i + 1] = len;
    }
    Ok(packed)
}

/// Size of one element: the slot followed by every captured region.
pub fn element_size(pairs: &[(u32, u32)]) -> usize {
    SLOT_SIZE + pairs.iter().map(|(_, len)| *len as usize).sum::<usize>()
}

/// Contains metadata like the account's capacity, element size,
/// number of updates, and locations of the account data being
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct AccountHistoryHeader {
    account_tag: [u8; 8],
    /// The target account. Only historical data from this account will be indexed.
    pub(crate) associated_account: Pubkey,
    /// Only this account can close the history account and reclaim its rent lamports.
    pub(crate) close_authority: Pubkey,
    /// If not `Pubkey::default()`, only this address can sign for historical updates.
    pub(crate) update_authority: Pubkey,
    /// Total amount of space available for elements.
    pub(crate) capacity: u32,
    /// Includes the size of the slot.
    pub(crate) data_element_size: u32,
    /// Total number of updates that have executed.
    num_updates: u64,
    /// New data must be at least this many slots newer than the
    /// most recently indexed data.
    pub(crate) min_slot_delay: u32,
    /// The account can be closed only after this delay.
    pub(crate) min_close_delay: u32,
    /// Zero until the close process starts, then the slot it started at.
    pub(crate) close_initiated: u64,
    /// Paired values in the form (offset, len). (0, 8) is the first
    /// 8 bytes; (48, 16) is a 16 byte span starting at byte 48.
    /// Unused pairs are zero.
    pub(crate) data_regions: [u32; 16],
}

impl Default for AccountHistoryHeader {
    fn default() -> Self {
        Self {
            account_tag: ACCOUNT_HISTORY_TAG,
            ..Self::zeroed()
        }
    }
}

impl AccountHistoryHeader {
    pub const LEN: usize = mem::size_of::<Self>();

    pub fn new(
        associated_account: Pubkey,
        close_authority: Pubkey,
        update_authority: Option<Pubkey>,
        capacity: u32,
        min_slot_delay: u32,
        min_close_delay: u32,
        data_regions: &[(u32, u32)],
    ) -> Result<Self> {
        require!(capacity > 0, AccountHistoryError::InvalidCapacity);
        Ok(Self {
            associated_account,
            close_authority,
            update_authority: update_authority.unwrap_or_default(),
            capacity,
            data_element_size: element_size(data_regions) as u32,
            min_slot_delay,
            min_close_delay,
            data_regions: sanitize_data_regions(data_regions)?,
            ..Self::default()
        })
    }

    pub fn is_tagged(&self) -> bool {
        self.account_tag == ACCOUNT_HISTORY_TAG
    }

    pub fn associated_account(&self) -> Pubkey {
        self.associated_account
    }

    pub fn close_authority(&self) -> Pubkey {
        self.close_authority
    }

    /// `None` when anyone may push updates.
    pub fn update_authority(&self) -> Option<Pubkey> {
        (self.update_authority != Pubkey::default()).then_some(self.update_authority)
    }

    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    pub fn data_element_size(&self) -> usize {
        self.data_element_size as usize
    }

    pub fn num_updates(&self) -> u64 {
        self.num_updates
    }

    pub fn min_slot_delay(&self) -> u32 {
        self.min_slot_delay
    }

    pub fn min_close_delay(&self) -> u32 {
        self.min_close_delay
    }

    /// Slot at which the close process started, if it has.
    pub fn close_initiated(&self) -> Option<Slot> {
        (self.close_initiated != 0).then_some(self.close_initiated)
    }

    /// The configured `(offset, len)` regions, in capture order.
    pub fn data_regions(&self) -> Vec<(u32, u32)> {
        self.data_regions
            .chunks_exact(2)
            .filter(|pair| pair[1] != 0)
            .map(|pair| (pair[0], pair[1]))
            .collect()
    }

    /// Number of stored elements, between 0 and capacity.
    pub fn len(&self) -> usize {
        std::cmp::min(self.num_updates as usize, self.capacity as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.num_updates == 0
    }

    /// Most recently modified element index. Zero when there is no data.
    pub fn most_recent_index(&self) -> usize {
        self.num_updates as usize % self.capacity.max(1) as usize
    }

    /// First slot at which the close may be resolved.
    pub fn closable_at(&self) -> Option<Slot> {
        self.close_initiated()
            .map(|slot| slot.saturating_add(u64::from(self.min_close_delay)))
    }

    /// Anyone may update when no update authority is set.
    pub fn check_update_authority(&self, signer: &Pubkey) -> Result<()> {
        if let Some(authority) = self.update_authority() {
            require_keys_eq!(authority, *signer, AccountHistoryError::NotUpdateAuthority);
        }
        Ok(())
    }

    pub fn check_watched_account(&self, account: &Pubkey) -> Result<()> {
        require_keys_eq!(
            *account,
            self.associated_account,
            AccountHistoryError::NotCorrectAccount
        );
        Ok(())
    }

    pub fn check_close_authority(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(
            *signer,
            self.close_authority,
            AccountHistoryError::NotCloseAuthority
        );
        Ok(())
    }

    /// Succeeds once the close was initiated and `now` has reached
    /// [`Self::closable_at`].
    pub fn check_closable(&self, now: Slot) -> Result<()> {
        let closable_at = self
            .closable_at()
            .ok_or(AccountHistoryError::CloseNotInitiated)?;
        require!(now >= closable_at, AccountHistoryError::CannotCloseYet);
        Ok(())
    }
}

/// Walks the element indices of a ring in either direction.
#[derive(Debug, Clone, Copy)]
pub struct RingCursor {
    index: usize,
    remaining: usize,
    capacity: usize,
    newest_first: bool,
}

impl RingCursor {
    pub fn newest_first(header: &AccountHistoryHeader) -> Self {
        Self {
            index: header.most_recent_index(),
            remaining: header.len(),
            capacity: header.capacity(),
            newest_first: true,
        }
    }

    pub fn oldest_first(header: &AccountHistoryHeader) -> Self {
        let capacity = header.capacity();
        let len = header.len();
        let index = if len == 0 {
            0
        } else {
            (header.most_recent_index() + capacity - (len - 1)) % capacity
        };
        Self {
            index,
            remaining: len,
            capacity,
            newest_first: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Iterator for RingCursor {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.index;
        self.remaining -= 1;
        self.index = if self.newest_first {
            if current == 0 { self.capacity - 1 } else { current - 1 }
        } else {
            (current + 1) % self.capacity
        };
        Some(current)
    }
}

/// Raw byte view over a history account: header plus packed elements.
#[derive(Debug)]
pub struct AccountHistoryRaw<'data> {
    /// Metadata about the account history
    pub(crate) header: &'data mut AccountHistoryHeader,
    /// Historical account state
    data: &'data mut [u8],
}

impl<'data> AccountHistoryRaw<'data> {
    /// Calculate the necessary size of an account history account
    /// with the given parameters.
    pub fn size_of(capacity: u32, data_regions: &[(u32, u32)]) -> usize {
        AccountHistoryHeader::LEN + capacity as usize * element_size(data_regions)
    }

    fn split(data: &'data mut [u8]) -> Result<(&'data mut AccountHistoryHeader, &'data mut [u8])> {
        require!(
            data.len() >= AccountHistoryHeader::LEN,
            AccountHistoryError::AccountTooSmall
        );
        let (header, data) = data.split_at_mut(AccountHistoryHeader::LEN);
        let header = bytemuck::try_from_bytes_mut::<AccountHistoryHeader>(header)
            .map_err(|_| AccountHistoryError::InvalidAccountTag)?;
        Ok((header, data))
    }

    /// Write `header` into a freshly allocated, zeroed account.
    pub fn initialize(data: &'data mut [u8], header: AccountHistoryHeader) -> Result<Self> {
        let (existing, data) = Self::split(data)?;
        require!(
            existing.account_tag == [0u8; 8],
            AccountHistoryError::InvalidAccountTag
        );
        require!(
            data.len() >= header.capacity() * header.data_element_size(),
            AccountHistoryError::AccountTooSmall
        );
        *existing = header;
        Ok(Self { header: existing, data })
    }

    /// Constructor for an already initialized account.
    pub fn from_buffer(data: &'data mut [u8]) -> Result<Self> {
        let (header, data) = Self::split(data)?;
        require!(header.is_tagged(), AccountHistoryError::InvalidAccountTag);
        require!(header.capacity > 0, AccountHistoryError::InvalidCapacity);
        require!(
            header.data_element_size() >= SLOT_SIZE,
            AccountHistoryError::InvalidElementSize
        );
        require!(
            data.len() >= header.capacity() * header.data_element_size(),
            AccountHistoryError::AccountTooSmall
        );
        Ok(Self { header, data })
    }

    pub fn header(&self) -> AccountHistoryHeader {
        *self.header
    }

    pub fn data(&self) -> Vec<u8> {
        self.data.to_vec()
    }

    fn element(&self, index: usize) -> &[u8] {
        let size = self.header.data_element_size();
        let offset = index * size;
        &self.data[offset..offset + size]
    }

    /// Most recently modified index. Returns zero when there is no data.
    pub fn most_recent_index(&self) -> usize {
        self.header.most_recent_index()
    }

    /// Most recently added value. Returns zeroed bytes when there is no data.
    pub fn most_recent_entry(&self) -> &[u8] {
        self.element(self.most_recent_index())
    }

    /// Slot recorded on the most recent element.
    pub fn most_recent_slot(&self) -> Slot {
        slot_of(self.most_recent_entry())
    }

    /// Add a new element built from the watched account's `data`.
    ///
    /// Concatenates all the configured data regions, prepends `slot`, and
    /// overwrites either an unused or the oldest element. Refused while the
    /// account is being closed or when `slot` is too close to the most
    /// recent element.
    pub fn push(&mut self, data: &[u8], slot: Slot) -> Result<()> {
        require!(
            self.header.close_initiated == 0,
            AccountHistoryError::AccountBeingClosed
        );
        if !self.header.is_empty() {
            let earliest = self
                .most_recent_slot()
                .saturating_add(u64::from(self.header.min_slot_delay));
            require!(earliest <= slot, AccountHistoryError::NotNewSlot);
        }
        let regions = self.header.data_regions();
        require!(
            regions
                .iter()
                .all(|&(offset, len)| (offset as usize + len as usize) <= data.len()),
            AccountHistoryError::DataRegionOutOfBounds
        );

        let size = self.header.data_element_size();
        let offset = (self.header.num_updates as usize + 1) % self.header.capacity() * size;
        let buf = &mut self.data[offset..offset + size];
        let (slot_bytes, mut rest) = buf.split_at_mut(SLOT_SIZE);
        slot_bytes.copy_from_slice(&slot.to_le_bytes());
        for (start, len) in regions {
            let (start, len) = (start as usize, len as usize);
            let (dst, tail) = rest.split_at_mut(len);
            dst.copy_from_slice(&data[start..start + len]);
            rest = tail;
        }

        self.header.num_updates += 1;
        Ok(())
    }

    /// Flag the account for closing at `slot`. Pushes are refused afterwards.
    ///
    /// Returns the recorded slot. Zero marks "not initiated", so slot 0 is
    /// recorded as 1.
    pub fn initiate_close(&mut self, slot: Slot) -> Result<Slot> {
        require!(
            self.header.close_initiated == 0,
            AccountHistoryError::CloseAlreadyInitiated
        );
        let slot = slot.max(1);
        self.header.close_initiated = slot;
        Ok(slot)
    }

    /// Total number of successful calls to `self.push`.
    pub fn num_updates(&self) -> usize {
        self.header.num_updates as usize
    }

    /// The account whose state is being recorded on this history account.
    pub fn associated_account(&self) -> Pubkey {
        self.header.associated_account
    }

    /// Maximum number of elements supported by this account.
    pub fn capacity(&self) -> usize {
        self.header.capacity()
    }

    /// The number of values indexed so far. Ranges from 0 to capacity.
    pub fn len(&self) -> usize {
        self.header.len()
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    pub fn iter(&self) -> AccountHistoryRawIterator<'_> {
        AccountHistoryRawIterator {
            bytes: &self.data[..],
            element_size: self.header.data_element_size(),
            cursor: RingCursor::newest_first(&*self.header),
        }
    }

    pub fn iter_rev(&self) -> AccountHistoryRawIterator<'_> {
        AccountHistoryRawIterator {
            bytes: &self.data[..],
            element_size: self.header.data_element_size(),
            cursor: RingCursor::oldest_first(&*self.header),
        }
    }
}

/// Reads the slot prefix of a raw element.
pub fn slot_of(element: &[u8]) -> Slot {
    let mut bytes = [0u8; SLOT_SIZE];
    bytes.copy_from_slice(&element[..SLOT_SIZE]);
    Slot::from_le_bytes(bytes)
}

impl Index<usize> for AccountHistoryRaw<'_> {
    type Output = [u8];

    fn index(&self, index: usize) -> &Self::Output {
        self.element(index % self.capacity())
    }
}

/// Iterates raw elements, newest to oldest from [`AccountHistoryRaw::iter`]
/// or oldest to newest from [`AccountHistoryRaw::iter_rev`].
pub struct AccountHistoryRawIterator<'a> {
    bytes: &'a [u8],
    element_size: usize,
    cursor: RingCursor,
}

impl<'a> Iterator for AccountHistoryRawIterator<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor.next()?;
        let offset = index * self.element_size;
        Some(&self.bytes[offset..offset + self.element_size])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining(), Some(self.cursor.remaining()))
    }
}

impl ExactSizeIterator for AccountHistoryRawIterator<'_> {}

impl<'a> From<&'a AccountHistoryRaw<'a>> for AccountHistoryRawIterator<'a> {
    fn from(value: &'a AccountHistoryRaw<'a>) -> Self {
        value.iter()
    }
}
