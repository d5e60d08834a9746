// Account history scenarios driven through the account layout the program uses

#[cfg(test)]
mod tests {
    use crate::utils::*;
    use account_history_program::interpreted::{AccountHistory, AccountHistoryIterator};
    use account_history_program::{AccountHistoryError, AccountHistoryRaw};
    use anchor_lang::prelude::*;
    use history_sdk::RawAccountHistory;

    fn record(data: &mut [u8], slot: u64, timestamp: i64) -> Result<()> {
        AccountHistoryRaw::from_buffer(data)?.push(&clock_bytes(slot, timestamp), slot)
    }

    #[test]
    fn test_clock_history_over_many_slots() {
        let ctx = TestContext::new();
        let mut data = ctx.history(8, None, 1, 0);

        for slot in 100..120u64 {
            record(&mut data, slot, 1_700_000_000 + slot as i64).unwrap();
        }

        let history = AccountHistory::<ClockSample>::from_buffer(&data).unwrap();
        assert_eq!(history.len(), 8);
        assert_eq!(history.num_updates(), 20);
        assert_eq!(history.associated_account(), ctx.watched);

        let samples: Vec<ClockSample> = AccountHistoryIterator::from(&history).copied().collect();
        assert_eq!(samples.first().unwrap().recorded_slot, 119);
        assert_eq!(samples.last().unwrap().recorded_slot, 112);
        for sample in &samples {
            assert_eq!(sample.recorded_slot, sample.clock_slot);
            assert_eq!(sample.unix_timestamp, 1_700_000_000 + sample.clock_slot as i64);
        }

        // The SDK's owned copy sees the same order
        let raw = RawAccountHistory::decode(Pubkey::new_unique(), &data).unwrap();
        let typed = raw.interpret::<ClockSample>().unwrap();
        assert_eq!(typed.values(), samples.as_slice());
    }

    #[test]
    fn test_slot_delay_throttles_updates() {
        let ctx = TestContext::new();
        let mut data = ctx.history(4, None, 10, 0);

        record(&mut data, 50, 0).unwrap();
        for slot in 51..60 {
            let err = record(&mut data, slot, 0).unwrap_err();
            assert_eq!(err, AccountHistoryError::NotNewSlot.into());
        }
        record(&mut data, 60, 0).unwrap();

        let raw = AccountHistoryRaw::from_buffer(&mut data).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.most_recent_slot(), 60);
    }

    #[test]
    fn test_close_lifecycle() {
        let ctx = TestContext::new();
        let mut data = ctx.history(4, Some(ctx.update_authority), 1, 25);

        record(&mut data, 10, 0).unwrap();
        let header = AccountHistoryRaw::from_buffer(&mut data).unwrap().header();
        assert_eq!(header.update_authority(), Some(ctx.update_authority));
        assert_eq!(header.close_authority(), ctx.payer);
        assert_eq!(header.closable_at(), None);

        // Recording stops once a close is underway
        AccountHistoryRaw::from_buffer(&mut data)
            .unwrap()
            .initiate_close(30)
            .unwrap();
        let header = AccountHistoryRaw::from_buffer(&mut data).unwrap().header();
        assert_eq!(header.close_initiated(), Some(30));
        assert_eq!(header.closable_at(), Some(55));
        let err = record(&mut data, 31, 0).unwrap_err();
        assert_eq!(err, AccountHistoryError::AccountBeingClosed.into());
    }

    #[test]
    fn test_watched_account_too_small() {
        let ctx = TestContext::new();
        let mut data = ctx.history(2, None, 1, 0);
        let err = AccountHistoryRaw::from_buffer(&mut data)
            .unwrap()
            .push(&[0u8; 39], 1)
            .unwrap_err();
        assert_eq!(err, AccountHistoryError::DataRegionOutOfBounds.into());
    }
}
