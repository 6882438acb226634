mod horizon;
pub use horizon::{Horizon, HorizonError};

mod mock;
pub use mock::{MockLedger, MockLedgerError};

use crate::ProviderError;
use async_trait::async_trait;
use auto_impl::auto_impl;
use sente_core::types::{Account, Address, SubmitReceipt};
use std::{error::Error, fmt::Debug};

#[async_trait]
#[auto_impl(&, Box, Arc)]
/// Trait implemented by clients of the ledger endpoint, which owns account
/// state and accepts synchronous submissions.
pub trait LedgerClient: Debug + Send + Sync {
    /// A ledger client error
    type Error: Error + Into<ProviderError>;

    /// Fetches a fresh snapshot of `account`
    async fn load_account(&self, account: &Address) -> Result<Account, Self::Error>;

    /// Submits a signed envelope and waits for it to be included
    async fn submit_transaction(&self, envelope: &str) -> Result<SubmitReceipt, Self::Error>;

    /// Creates and funds `account` through the test network's funding service
    async fn fund_account(&self, account: &Address) -> Result<(), Self::Error>;
}
