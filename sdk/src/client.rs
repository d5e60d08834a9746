//! Blocking RPC client for the history programs

use crate::config::ProviderConfig;
use crate::decode::{AccountHistory, OracleHistorySnapshot, RawAccountHistory};
use crate::instructions::{self, HistoryParams};
use crate::pda::{account_history_address, oracle_history_address};
use crate::{Result, SdkError};
use anchor_client::{Client, Cluster, Program};
use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::Discriminator;
use bytemuck::Pod;
use oracle_history_program::OracleHistory;
use solana_client::rpc_config::RpcProgramAccountsConfig;
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    signature::{Keypair, Signature},
    signer::Signer,
};
use std::rc::Rc;
use tracing::{debug, info};

/// Client for both history programs, paying with a single wallet
pub struct HistoryClient {
    pub client: Client<Rc<Keypair>>,
    pub payer: Rc<Keypair>,
    pub oracle_history: Program<Rc<Keypair>>,
    pub account_history: Program<Rc<Keypair>>,
}

impl HistoryClient {
    pub fn new(
        cluster: Cluster,
        payer: Rc<Keypair>,
        commitment: Option<CommitmentConfig>,
    ) -> Result<Self> {
        let client = Client::new_with_options(
            cluster,
            payer.clone(),
            commitment.unwrap_or(CommitmentConfig::confirmed()),
        );

        let oracle_history = client.program(oracle_history_program::ID)?;
        let account_history = client.program(account_history_program::ID)?;

        Ok(Self {
            client,
            payer,
            oracle_history,
            account_history,
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        debug!(url = %config.url, wallet = %config.wallet.display(), "Connecting");
        Self::new(
            config.cluster()?,
            Rc::new(config.payer()?),
            Some(config.commitment),
        )
    }

    /// Connect using the Anchor provider environment.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ProviderConfig::from_env()?)
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    fn send(&self, program: &Program<Rc<Keypair>>, ix: Instruction) -> Result<Signature> {
        Ok(program.request().instruction(ix).send()?)
    }

    /// Call the oracle-history program's `initialize`.
    pub fn initialize(&self) -> Result<Signature> {
        let signature = self.send(&self.oracle_history, instructions::initialize())?;
        info!(%signature, "Initialized oracle history program");
        Ok(signature)
    }

    /// Create the history account for `oracle`. Returns its address.
    pub fn initialize_oracle_history(&self, oracle: Pubkey) -> Result<(Pubkey, Signature)> {
        let history = oracle_history_address(&oracle);
        let signature = self.send(
            &self.oracle_history,
            instructions::initialize_oracle_history(self.payer(), oracle),
        )?;
        info!(%oracle, %history, %signature, "Created oracle history");
        Ok((history, signature))
    }

    pub fn crank(&self, oracle: Pubkey) -> Result<Signature> {
        let signature = self.send(&self.oracle_history, instructions::crank(oracle))?;
        debug!(%oracle, %signature, "Cranked oracle history");
        Ok(signature)
    }

    /// Create a history watching `watched_account`, seeded by a fresh keypair.
    pub fn initialize_account_history(
        &self,
        watched_account: Pubkey,
        params: &HistoryParams,
    ) -> Result<(Pubkey, Signature)> {
        let seed = Keypair::new();
        let history = account_history_address(&seed.pubkey());
        let ix = instructions::initialize_account_history(
            self.payer(),
            seed.pubkey(),
            watched_account,
            params,
        );
        let signature = self
            .account_history
            .request()
            .instruction(ix)
            .signer(&seed)
            .send()?;
        info!(
            %watched_account,
            %history,
            capacity = params.capacity,
            %signature,
            "Created account history"
        );
        Ok((history, signature))
    }

    /// Record the watched account's current state on `history`.
    pub fn update(&self, history: Pubkey) -> Result<Signature> {
        let watched = self.fetch_account_history(history)?.header.associated_account();
        let signature = self.send(
            &self.account_history,
            instructions::update(self.payer(), history, watched),
        )?;
        debug!(%history, %watched, %signature, "Updated account history");
        Ok(signature)
    }

    pub fn initialize_account_close(&self, history: Pubkey) -> Result<Signature> {
        let signature = self.send(
            &self.account_history,
            instructions::initialize_account_close(self.payer(), history),
        )?;
        info!(%history, %signature, "Close initiated");
        Ok(signature)
    }

    /// Finish closing `history`; rent goes to `rent_recipient`, or the payer when unset.
    pub fn resolve_account_close(
        &self,
        history: Pubkey,
        rent_recipient: Option<Pubkey>,
    ) -> Result<Signature> {
        let recipient = rent_recipient.unwrap_or_else(|| self.payer());
        let signature = self.send(
            &self.account_history,
            instructions::resolve_account_close(self.payer(), history, recipient),
        )?;
        info!(%history, %recipient, %signature, "Closed account history");
        Ok(signature)
    }

    /// Transport failures surface as `SolanaClient`; only a missing account
    /// is `AccountNotFound`.
    fn fetch_owned(&self, address: Pubkey, owner: Pubkey) -> Result<Account> {
        let rpc = self.account_history.rpc();
        let account = rpc
            .get_account_with_commitment(&address, rpc.commitment())?
            .value;
        owned_account(address, owner, account)
    }

    pub fn fetch_oracle_history(&self, oracle: Pubkey) -> Result<OracleHistorySnapshot> {
        let address = oracle_history_address(&oracle);
        let account = self.fetch_owned(address, oracle_history_program::ID)?;
        OracleHistorySnapshot::decode(address, &account.data)
    }

    pub fn fetch_account_history(&self, history: Pubkey) -> Result<RawAccountHistory> {
        let account = self.fetch_owned(history, account_history_program::ID)?;
        RawAccountHistory::decode(history, &account.data)
    }

    /// Fetch `history`, reading every element as `T` (slot prefix included).
    pub fn fetch_typed_account_history<T: Pod>(&self, history: Pubkey) -> Result<AccountHistory<T>> {
        self.fetch_account_history(history)?.interpret()
    }

    /// Every oracle history account owned by the program.
    pub fn oracle_histories(&self) -> Result<Vec<OracleHistorySnapshot>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![
                RpcFilterType::DataSize(OracleHistory::SPACE as u64),
                RpcFilterType::Memcmp(Memcmp::new_base58_encoded(0, OracleHistory::DISCRIMINATOR)),
            ]),
            ..RpcProgramAccountsConfig::default()
        };
        let accounts = self
            .oracle_history
            .rpc()
            .get_program_accounts_with_config(&oracle_history_program::ID, config)?;
        debug!(count = accounts.len(), "Fetched oracle histories");

        accounts
            .into_iter()
            .map(|(address, account)| OracleHistorySnapshot::decode(address, &account.data))
            .collect()
    }
}

fn owned_account(address: Pubkey, owner: Pubkey, account: Option<Account>) -> Result<Account> {
    let account = account.ok_or(SdkError::AccountNotFound(address))?;
    if account.owner != owner {
        return Err(SdkError::WrongOwner {
            address,
            expected: owner,
        });
    }
    Ok(account)
}
