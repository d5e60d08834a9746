//! Decoding of history accounts as they come back from RPC

use account_history_program::{AccountHistoryHeader, AccountHistoryRaw};
use anchor_lang::prelude::Pubkey;
use anchor_lang::Discriminator;
use bytemuck::{Pod, Zeroable};
use history_sdk::{AccountHistory, OracleHistorySnapshot, RawAccountHistory, SdkError};
use oracle_history_program::pyth::{
    PriceAccountHeader, ACCOUNT_TYPE_PRICE, MAGIC, PRICE_ACCOUNT_LEN, VERSION_2,
};
use oracle_history_program::{OracleHistory, OracleType};

const REGIONS: [(u32, u32); 2] = [(0, 8), (16, 8)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct Sample {
    slot: u64,
    first: u64,
    third: u64,
}

fn watched(first: u64, third: u64) -> Vec<u8> {
    [first.to_le_bytes(), [0xff; 8], third.to_le_bytes()].concat()
}

fn history_bytes(capacity: u32, pushes: &[(u64, u64, u64)]) -> Vec<u8> {
    let header = AccountHistoryHeader::new(
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        None,
        capacity,
        1,
        0,
        &REGIONS,
    )
    .unwrap();
    let mut data = vec![0u8; AccountHistoryRaw::size_of(capacity, &REGIONS)];
    let mut history = AccountHistoryRaw::initialize(&mut data, header).unwrap();
    for &(slot, first, third) in pushes {
        history.push(&watched(first, third), slot).unwrap();
    }
    data
}

fn pyth_price(price: i64, slot: u64) -> Vec<u8> {
    let mut account = PriceAccountHeader::zeroed();
    account.magic = MAGIC;
    account.ver = VERSION_2;
    account.atype = ACCOUNT_TYPE_PRICE;
    account.size = PRICE_ACCOUNT_LEN as u32;
    account.prev_price = price;
    account.prev_slot = slot;
    let mut data = bytemuck::bytes_of(&account).to_vec();
    data.resize(PRICE_ACCOUNT_LEN, 0);
    data
}

#[test]
fn test_raw_history_newest_first() {
    let data = history_bytes(3, &[(10, 1, 100), (11, 2, 200), (12, 3, 300), (13, 4, 400)]);
    let history = RawAccountHistory::decode(Pubkey::new_unique(), &data).unwrap();

    let slots: Vec<u64> = history.elements.iter().map(|e| e.slot).collect();
    assert_eq!(slots, vec![13, 12, 11]);
    let latest = history.latest().unwrap();
    assert_eq!(latest.data, [4u64.to_le_bytes(), 400u64.to_le_bytes()].concat());
    assert_eq!(history.header.num_updates(), 4);
    assert_eq!(history.header.data_regions(), REGIONS.to_vec());
}

#[test]
fn test_typed_history() {
    let data = history_bytes(4, &[(5, 1, 10), (6, 2, 20)]);
    let history = AccountHistory::<Sample>::decode(Pubkey::new_unique(), &data).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(
        history.latest(),
        Some(&Sample {
            slot: 6,
            first: 2,
            third: 20
        })
    );
    let thirds: Vec<u64> = history.values().iter().map(|s| s.third).collect();
    assert_eq!(thirds, vec![20, 10]);
}

#[test]
fn test_typed_history_rejects_wrong_size() {
    let data = history_bytes(2, &[(1, 1, 1)]);
    let err = AccountHistory::<u64>::decode(Pubkey::new_unique(), &data).unwrap_err();
    assert!(matches!(err, SdkError::InvalidAccount { .. }));
}

#[test]
fn test_raw_history_rejects_element_smaller_than_slot() {
    let mut data = history_bytes(2, &[(1, 1, 1)]);
    // data_element_size follows the tag, three keys and the capacity
    let offset = 8 + 3 * 32 + 4;
    data[offset..offset + 4].copy_from_slice(&4u32.to_le_bytes());
    let err = RawAccountHistory::decode(Pubkey::new_unique(), &data).unwrap_err();
    assert!(matches!(err, SdkError::InvalidAccount { .. }));
}

#[test]
fn test_raw_history_rejects_foreign_accounts() {
    let address = Pubkey::new_unique();
    assert!(RawAccountHistory::decode(address, &[0u8; 16]).is_err());
    assert!(RawAccountHistory::decode(address, &vec![0u8; 400]).is_err());

    let mut data = history_bytes(4, &[]);
    data.truncate(AccountHistoryHeader::LEN + 10);
    assert!(matches!(
        RawAccountHistory::decode(address, &data),
        Err(SdkError::InvalidAccount { .. })
    ));
}

#[test]
fn test_oracle_history_snapshot() {
    let oracle = Pubkey::new_unique();
    let mut history = OracleHistory::zeroed();
    history.setup(oracle, OracleType::Pyth).unwrap();
    history.push(oracle, &pyth_price(1_000, 40)).unwrap();
    history.push(oracle, &pyth_price(1_050, 41)).unwrap();

    let mut data = OracleHistory::DISCRIMINATOR.to_vec();
    data.extend_from_slice(bytemuck::bytes_of(&history));
    assert_eq!(data.len(), OracleHistory::SPACE);

    let address = history_sdk::oracle_history_address(&oracle);
    let snapshot = OracleHistorySnapshot::decode(address, &data).unwrap();
    assert_eq!(snapshot.associated_oracle(), oracle);
    assert_eq!(snapshot.oracle_type().unwrap(), OracleType::Pyth);
    assert_eq!(snapshot.latest().map(|p| p.price), Some(1_050));
    let slots: Vec<u64> = snapshot.values().iter().map(|p| p.slot).collect();
    assert_eq!(slots, vec![41, 40]);

    data[0] ^= 0xff;
    assert!(OracleHistorySnapshot::decode(address, &data).is_err());
}
