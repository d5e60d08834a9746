// Oracle history scenarios, including the SDK decoding of the stored account

#[cfg(test)]
mod tests {
    use crate::utils::*;
    use anchor_lang::prelude::*;
    use anchor_lang::Discriminator;
    use bytemuck::Zeroable;
    use history_sdk::OracleHistorySnapshot;
    use oracle_history_program::{OracleHistory, OracleHistoryError, OracleType, ORACLE_HISTORY_SIZE};

    fn account_data(history: &OracleHistory) -> Vec<u8> {
        let mut data = OracleHistory::DISCRIMINATOR.to_vec();
        data.extend_from_slice(bytemuck::bytes_of(history));
        data
    }

    #[test]
    fn test_publisher_feed_over_a_full_ring() {
        let oracle = Pubkey::new_unique();
        let mut history = OracleHistory::zeroed();
        history.setup(oracle, OracleType::Pyth).unwrap();

        let mut slot = 1_000u64;
        let mut cranked = 0;
        for step in 0..(ORACLE_HISTORY_SIZE * 2) {
            // The oracle publishes every other crank
            if step % 2 == 0 {
                slot += 3;
            }
            match history.push(oracle, &pyth_price(slot as i64 * 7, slot)) {
                Ok(_) => cranked += 1,
                Err(err) => assert_eq!(err, OracleHistoryError::NotNewSlot.into()),
            }
        }
        assert_eq!(cranked, ORACLE_HISTORY_SIZE);
        assert_eq!(history.len(), ORACLE_HISTORY_SIZE);

        let address = OracleHistory::address(&oracle).0;
        let snapshot = OracleHistorySnapshot::decode(address, &account_data(&history)).unwrap();
        let values = snapshot.values();
        assert_eq!(values.len(), ORACLE_HISTORY_SIZE);
        assert!(values.windows(2).all(|pair| pair[0].slot > pair[1].slot));
        assert_eq!(snapshot.latest().unwrap().slot, slot);
        assert_eq!(snapshot.latest().unwrap().price, slot as i64 * 7);
    }

    #[test]
    fn test_history_is_bound_to_one_oracle() {
        let oracle = Pubkey::new_unique();
        let mut history = OracleHistory::zeroed();
        history.setup(oracle, OracleType::Pyth).unwrap();

        let err = history
            .push(Pubkey::new_unique(), &pyth_price(1, 1))
            .unwrap_err();
        assert_eq!(err, OracleHistoryError::InvalidOracleAddress.into());
        assert!(history.is_empty());
    }

    #[test]
    fn test_pda_matches_sdk() {
        let oracle = Pubkey::new_unique();
        assert_eq!(
            OracleHistory::address(&oracle).0,
            history_sdk::oracle_history_address(&oracle)
        );
    }
}
