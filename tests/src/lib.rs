// Integration tests for the history programs
pub mod utils;
pub mod account_history_tests;
pub mod oracle_history_tests;
pub mod smoke_tests; // Require a local validator with both programs deployed
