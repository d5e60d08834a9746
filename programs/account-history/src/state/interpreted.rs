//! Typed, read-only view over a history account whose elements are `T`.

use crate::error::AccountHistoryError;
use crate::state::{AccountHistoryHeader, RingCursor};
use anchor_lang::prelude::*;
use bytemuck::Pod;
use std::fmt;
use std::mem;
use std::ops::Index;

/// History account whose elements are reinterpreted as `T`.
///
/// `T` must describe the whole element, slot prefix included.
pub struct AccountHistory<'data, T: Pod> {
    header: &'data AccountHistoryHeader,
    data: &'data [T],
}

impl<T: Pod + fmt::Debug> fmt::Debug for AccountHistory<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountHistory")
            .field("header", self.header)
            .field("values", &AccountHistoryIterator::from(self).collect::<Vec<_>>())
            .finish()
    }
}

impl<'data, T: Pod> AccountHistory<'data, T> {
    pub fn from_buffer(data: &'data [u8]) -> Result<Self> {
        require!(
            data.len() >= AccountHistoryHeader::LEN,
            AccountHistoryError::AccountTooSmall
        );
        let (header, data) = data.split_at(AccountHistoryHeader::LEN);
        let header = bytemuck::try_from_bytes::<AccountHistoryHeader>(header)
            .map_err(|_| AccountHistoryError::InvalidAccountTag)?;
        require!(header.is_tagged(), AccountHistoryError::InvalidAccountTag);
        require!(header.capacity > 0, AccountHistoryError::InvalidCapacity);
        require!(
            mem::size_of::<T>() == header.data_element_size(),
            AccountHistoryError::InvalidDataType
        );
        let elements = data
            .get(..header.capacity() * header.data_element_size())
            .ok_or(AccountHistoryError::AccountTooSmall)?;
        let data = bytemuck::try_cast_slice::<u8, T>(elements)
            .map_err(|_| AccountHistoryError::InvalidDataType)?;
        Ok(Self { header, data })
    }

    pub fn header(&self) -> AccountHistoryHeader {
        *self.header
    }

    /// All element slots in storage order, including unused ones.
    pub fn data(&self) -> Vec<T> {
        self.data.to_vec()
    }

    /// Most recently modified index. Returns zero when there is no data.
    pub fn most_recent_index(&self) -> usize {
        self.header.most_recent_index()
    }

    /// Most recently added value. Returns zeroed data when there is no data.
    pub fn most_recent_entry(&self) -> &T {
        &self.data[self.most_recent_index()]
    }

    /// Total number of element updates that have taken place on this history account.
    pub fn num_updates(&self) -> usize {
        self.header.num_updates() as usize
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
}

impl<T: Pod> Index<usize> for AccountHistory<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index % self.capacity()]
    }
}

/// Iterates from newest value to oldest.
pub struct AccountHistoryIterator<'a, T: Pod> {
    data: &'a [T],
    cursor: RingCursor,
}

/// Iterates from oldest value to newest.
pub struct AccountHistoryIteratorRev<'a, T: Pod> {
    data: &'a [T],
    cursor: RingCursor,
}

impl<'a, T: Pod> Iterator for AccountHistoryIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next().map(|index| &self.data[index])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining(), Some(self.cursor.remaining()))
    }
}

impl<'a, T: Pod> Iterator for AccountHistoryIteratorRev<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next().map(|index| &self.data[index])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.cursor.remaining(), Some(self.cursor.remaining()))
    }
}

impl<T: Pod> ExactSizeIterator for AccountHistoryIterator<'_, T> {}
impl<T: Pod> ExactSizeIterator for AccountHistoryIteratorRev<'_, T> {}

impl<T: Pod> fmt::Debug for AccountHistoryIterator<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountHistoryIterator")
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<T: Pod> fmt::Debug for AccountHistoryIteratorRev<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountHistoryIteratorRev")
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<'a, T: Pod> From<&'a AccountHistory<'a, T>> for AccountHistoryIterator<'a, T> {
    fn from(value: &'a AccountHistory<'a, T>) -> Self {
        Self {
            data: value.data,
            cursor: RingCursor::newest_first(value.header),
        }
    }
}

impl<'a, T: Pod> From<&'a AccountHistory<'a, T>> for AccountHistoryIteratorRev<'a, T> {
    fn from(value: &'a AccountHistory<'a, T>) -> Self {
        Self {
            data: value.data,
            cursor: RingCursor::oldest_first(value.header),
        }
    }
}
