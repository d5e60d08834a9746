use anchor_client::ClientError;
use anchor_lang::prelude::Pubkey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Anchor client error: {0}")]
    AnchorClient(Box<ClientError>),

    #[error("Solana client error: {0}")]
    SolanaClient(Box<solana_client::client_error::ClientError>),

    #[error("Program error: {0}")]
    Program(#[from] anchor_lang::error::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to load wallet from {path}: {reason}")]
    Wallet { path: String, reason: String },

    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    #[error("Account {address} is not owned by {expected}")]
    WrongOwner { address: Pubkey, expected: Pubkey },

    #[error("Account {address} could not be decoded: {reason}")]
    InvalidAccount { address: Pubkey, reason: String },

    #[error("Invalid data region {0:?}, expected OFFSET:LEN")]
    InvalidDataRegion(String),
}

impl From<ClientError> for SdkError {
    fn from(err: ClientError) -> Self {
        Self::AnchorClient(Box::new(err))
    }
}

impl From<solana_client::client_error::ClientError> for SdkError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        Self::SolanaClient(Box::new(err))
    }
}
