use anchor_lang::prelude::*;
use anchor_lang::solana_program::clock::Slot;
use bytemuck::{Pod, Zeroable};

use crate::error::OracleHistoryError;
use crate::pyth::load_price_account;
use crate::svec_modulo::{StackVecModulo, StackVecModuloIterator};

/// Number of prices kept per oracle.
///
/// Cannot be larger than `(10240 - header) / mem::size_of::<Price>()`.
pub const ORACLE_HISTORY_SIZE: usize = 100;

/// A price and the slot it was published at.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Price {
    pub price: i64,
    pub slot: Slot,
}

/// Determines how the associated oracle account is deserialized.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum OracleType {
    #[default]
    Pyth = 0,
}

impl TryFrom<u8> for OracleType {
    type Error = OracleHistoryError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pyth),
            _ => Err(OracleHistoryError::UnknownOracleType),
        }
    }
}

const _: () = assert!(std::mem::size_of::<[Price; ORACLE_HISTORY_SIZE]>() % 8 == 0);

// SAFETY: `Price` is Pod and `[Price; ORACLE_HISTORY_SIZE]` is a multiple of 8
// bytes (asserted above), so the trailing `u64` counter leaves no padding.
unsafe impl Pod for StackVecModulo<Price, ORACLE_HISTORY_SIZE> {}

/// Stores oracle price data and a header naming the oracle and how to
/// read it.
#[account(zero_copy)]
pub struct OracleHistory {
    associated_oracle: Pubkey,
    oracle_type: u8,
    _padding0: [u8; 7],
    prices: StackVecModulo<Price, ORACLE_HISTORY_SIZE>,
}

impl OracleHistory {
    pub const PRICES_LEN: usize = ORACLE_HISTORY_SIZE;
    /// Account space including the Anchor discriminator.
    pub const SPACE: usize = 8 + std::mem::size_of::<OracleHistory>();

    /// PDA of the history account for `oracle`.
    pub fn address(oracle: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[oracle.as_ref()], &crate::ID)
    }

    /// Bind a freshly created history account to its oracle.
    pub fn setup(&mut self, oracle: Pubkey, oracle_type: OracleType) -> Result<()> {
        require!(
            self.associated_oracle == Pubkey::default() && self.prices.is_empty(),
            OracleHistoryError::AlreadyInitialized
        );
        self.associated_oracle = oracle;
        self.oracle_type = oracle_type as u8;
        Ok(())
    }

    pub fn associated_oracle(&self) -> Pubkey {
        self.associated_oracle
    }

    pub fn oracle_type(&self) -> Result<OracleType> {
        Ok(OracleType::try_from(self.oracle_type)?)
    }

    /// Extract a new price from oracle account data.
    pub fn get_price(&self, address: Pubkey, data: &[u8]) -> Result<Price> {
        require_keys_eq!(
            address,
            self.associated_oracle,
            OracleHistoryError::InvalidOracleAddress
        );
        match self.oracle_type()? {
            OracleType::Pyth => {
                let price_account = load_price_account(data)
                    .ok_or(OracleHistoryError::InvalidOracleDataPyth)?;
                Ok(Price {
                    price: price_account.prev_price,
                    slot: price_account.prev_slot,
                })
            }
        }
    }

    /// Push a new price onto the history. The price must be strictly newer
    /// than the most recent entry.
    pub fn push(&mut self, address: Pubkey, data: &[u8]) -> Result<Price> {
        let price = self.get_price(address, data)?;
        if !self.prices.is_empty() && price.slot <= self.prices.most_recent_entry().slot {
            return err!(OracleHistoryError::NotNewSlot);
        }
        self.prices.push(price);
        Ok(price)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn most_recent(&self) -> Option<&Price> {
        (!self.prices.is_empty()).then(|| self.prices.most_recent_entry())
    }

    /// Returns an iterator over the values, from newest to oldest.
    pub fn values(&self) -> StackVecModuloIterator<'_, Price, ORACLE_HISTORY_SIZE> {
        StackVecModuloIterator::from(&self.prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pyth::mock_price_account;
    use sha2::{Digest, Sha256};

    fn history_for(oracle: Pubkey) -> OracleHistory {
        let mut history = OracleHistory::zeroed();
        history.setup(oracle, OracleType::Pyth).unwrap();
        history
    }

    #[test]
    fn test_layout_has_no_padding() {
        assert_eq!(std::mem::size_of::<Price>(), 16);
        assert_eq!(
            std::mem::size_of::<OracleHistory>(),
            32 + 8 + 16 * ORACLE_HISTORY_SIZE + 8
        );
        assert!(OracleHistory::SPACE <= 10_240);
    }

    #[test]
    fn test_address_uses_only_oracle_seed() {
        let oracle = Pubkey::new_unique();
        let (expected, _) = Pubkey::find_program_address(&[oracle.as_ref()], &crate::ID);
        assert_eq!(OracleHistory::address(&oracle).0, expected);
    }

    #[test]
    fn test_discriminator() {
        let hash = Sha256::digest(b"account:OracleHistory");
        assert_eq!(OracleHistory::DISCRIMINATOR, &hash[..8]);
    }

    #[test]
    fn test_push_and_values() {
        let oracle = Pubkey::new_unique();
        let mut history = history_for(oracle);
        assert!(history.most_recent().is_none());

        for (slot, price) in [(10u64, 100i64), (11, 110), (15, 150)] {
            history.push(oracle, &mock_price_account(price, slot)).unwrap();
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.most_recent(), Some(&Price { price: 150, slot: 15 }));
        let prices: Vec<i64> = history.values().map(|p| p.price).collect();
        assert_eq!(prices, vec![150, 110, 100]);
    }

    #[test]
    fn test_rejects_stale_slot() {
        let oracle = Pubkey::new_unique();
        let mut history = history_for(oracle);
        history.push(oracle, &mock_price_account(1, 20)).unwrap();
        let err = history.push(oracle, &mock_price_account(2, 20)).unwrap_err();
        assert_eq!(err, OracleHistoryError::NotNewSlot.into());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_first_price_accepted_at_slot_zero() {
        let oracle = Pubkey::new_unique();
        let mut history = history_for(oracle);
        history.push(oracle, &mock_price_account(5, 0)).unwrap();
        let err = history.push(oracle, &mock_price_account(6, 0)).unwrap_err();
        assert_eq!(err, OracleHistoryError::NotNewSlot.into());
        history.push(oracle, &mock_price_account(6, 1)).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_rejects_wrong_oracle() {
        let oracle = Pubkey::new_unique();
        let history = history_for(oracle);
        let err = history
            .get_price(Pubkey::new_unique(), &mock_price_account(1, 1))
            .unwrap_err();
        assert_eq!(err, OracleHistoryError::InvalidOracleAddress.into());
    }

    #[test]
    fn test_rejects_garbage_data() {
        let oracle = Pubkey::new_unique();
        let history = history_for(oracle);
        let err = history.get_price(oracle, &[0u8; 300]).unwrap_err();
        assert_eq!(err, OracleHistoryError::InvalidOracleDataPyth.into());
    }

    #[test]
    fn test_setup_twice_fails() {
        let oracle = Pubkey::new_unique();
        let mut history = history_for(oracle);
        let err = history.setup(oracle, OracleType::Pyth).unwrap_err();
        assert_eq!(err, OracleHistoryError::AlreadyInitialized.into());
    }

    #[test]
    fn test_wraps_at_capacity() {
        let oracle = Pubkey::new_unique();
        let mut history = history_for(oracle);
        for slot in 1..=(ORACLE_HISTORY_SIZE as u64 + 5) {
            history
                .push(oracle, &mock_price_account(slot as i64 * 10, slot))
                .unwrap();
        }
        assert_eq!(history.len(), ORACLE_HISTORY_SIZE);
        let newest = history.values().next().unwrap();
        let oldest = history.values().last().unwrap();
        assert_eq!(newest.slot, ORACLE_HISTORY_SIZE as u64 + 5);
        assert_eq!(oldest.slot, 6);
    }

    #[test]
    fn test_oracle_type_roundtrip() {
        assert_eq!(OracleType::try_from(0).unwrap(), OracleType::Pyth);
        assert!(OracleType::try_from(7).is_err());
    }
}
