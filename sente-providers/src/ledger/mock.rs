use super::LedgerClient;
use crate::{errors::RpcError, JsonRpcError, ProviderError, SubmissionError};
use async_trait::async_trait;
use sente_core::types::{
    Account, Address, EnvelopeError, SignedTransaction, SubmitReceipt, TESTNET_PASSPHRASE,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use thiserror::Error;

/// In-memory ledger used in test environments.
///
/// Accounts are created with [`MockLedger::insert_account`]. A submission is
/// accepted only if its sequence number is exactly one past the account's
/// current sequence, which then advances.
#[derive(Clone, Debug)]
pub struct MockLedger {
    network_passphrase: String,
    accounts: Arc<Mutex<HashMap<Address, Account>>>,
    submissions: Arc<Mutex<Vec<String>>>,
    ledger: Arc<Mutex<u32>>,
}

#[derive(Error, Debug)]
/// Errors for the `MockLedger`
pub enum MockLedgerError {
    #[error("account not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Rejected(SubmissionError),
}

impl RpcError for MockLedgerError {
    fn as_error_response(&self) -> Option<&JsonRpcError> {
        None
    }

    fn as_serde_error(&self) -> Option<&serde_json::Error> {
        None
    }
}

impl From<MockLedgerError> for ProviderError {
    fn from(src: MockLedgerError) -> Self {
        match src {
            MockLedgerError::NotFound(account) => ProviderError::AccountNotFound(account),
            MockLedgerError::Rejected(err) => ProviderError::Submission(err),
            other => ProviderError::LedgerClientError(Box::new(other)),
        }
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new(TESTNET_PASSPHRASE)
    }
}

impl MockLedger {
    pub fn new(network_passphrase: impl Into<String>) -> Self {
        Self {
            network_passphrase: network_passphrase.into(),
            accounts: Arc::new(Mutex::new(HashMap::new())),
            submissions: Arc::new(Mutex::new(Vec::new())),
            ledger: Arc::new(Mutex::new(1)),
        }
    }

    /// Adds or replaces an account
    pub fn insert_account(&self, account: Account) {
        self.accounts.lock().unwrap().insert(account.account_id, account);
    }

    /// The current state of an account
    pub fn account(&self, id: &Address) -> Option<Account> {
        self.accounts.lock().unwrap().get(id).cloned()
    }

    /// Envelopes accepted so far, in submission order
    pub fn submissions(&self) -> Vec<String> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    type Error = MockLedgerError;

    async fn load_account(&self, account: &Address) -> Result<Account, MockLedgerError> {
        self.account(account).ok_or_else(|| MockLedgerError::NotFound(account.to_string()))
    }

    async fn submit_transaction(&self, envelope: &str) -> Result<SubmitReceipt, MockLedgerError> {
        let signed = SignedTransaction::from_encoded(envelope, &self.network_passphrase)?;
        let tx = signed.transaction();

        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(&tx.source)
            .ok_or_else(|| MockLedgerError::NotFound(tx.source.to_string()))?;
        if signed.signatures().is_empty() {
            return Err(MockLedgerError::Rejected(SubmissionError::from_result_code(
                "400",
                Some("tx_bad_auth"),
            )))
        }
        if tx.sequence != account.sequence + 1 {
            return Err(MockLedgerError::Rejected(SubmissionError::from_result_code(
                "400",
                Some("tx_bad_seq"),
            )))
        }
        account.sequence = tx.sequence;
        drop(accounts);

        self.submissions.lock().unwrap().push(envelope.to_owned());
        let mut ledger = self.ledger.lock().unwrap();
        *ledger += 1;
        Ok(SubmitReceipt { hash: signed.hash(), ledger: *ledger, successful: true })
    }

    async fn fund_account(&self, account: &Address) -> Result<(), MockLedgerError> {
        let mut accounts = self.accounts.lock().unwrap();
        let funded = accounts
            .remove(account)
            .unwrap_or_else(|| Account::new(*account, 0))
            .with_native_balance("10000.0000000");
        accounts.insert(*account, funded);
        Ok(())
    }
}
