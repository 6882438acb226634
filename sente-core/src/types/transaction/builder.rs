use super::{Memo, Operation, TimeBounds, Transaction, BASE_FEE, DEFAULT_TX_TIMEOUT, MAX_MEMO_TEXT_LEN};
use crate::types::{Account, Address};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("fee must be a positive number of stroops")]
    InvalidFee,
    #[error("timeout must be positive, got {0} seconds")]
    InvalidTimeout(i64),
    #[error("a transaction needs an operation")]
    MissingOperation,
    #[error("a transaction carries exactly one operation")]
    TooManyOperations,
    #[error("text memo is {0} bytes long, the limit is 28")]
    MemoTooLong(usize),
    #[error("account sequence number is exhausted")]
    SequenceOverflow,
    #[error("{0} is a contract and cannot be a transaction source")]
    ContractSource(Address),
}

/// Builds an unsigned [`Transaction`] from an account snapshot.
///
/// The builder takes the snapshot by value: the built transaction uses the
/// snapshot's sequence number plus one, so a snapshot builds one transaction.
///
/// ```rust
/// use sente_core::types::{
///     transaction::{BuilderError, TransactionBuilder},
///     Account, Address, Network, Operation, Payment,
/// };
///
/// let account = Account::new(Address::account([1u8; 32]), 9);
/// let pay = Operation::Payment(Payment { destination: Address::account([2u8; 32]), amount: 1 });
///
/// let err = TransactionBuilder::new(account.clone(), Network::Testnet.passphrase())
///     .timeout(0)
///     .operation(pay.clone())
///     .build()
///     .unwrap_err();
/// assert_eq!(err, BuilderError::InvalidTimeout(0));
///
/// let tx = TransactionBuilder::new(account, Network::Testnet.passphrase())
///     .operation(pay)
///     .build()
///     .unwrap();
/// assert_eq!(tx.sequence, 10);
/// ```
#[derive(Clone, Debug)]
#[must_use = "a builder does nothing until `build` is called"]
pub struct TransactionBuilder {
    account: Account,
    network_passphrase: String,
    fee: u32,
    memo: Option<Memo>,
    operations: Vec<Operation>,
    timeout: i64,
}

impl TransactionBuilder {
    pub fn new(account: Account, network_passphrase: impl Into<String>) -> Self {
        Self {
            account,
            network_passphrase: network_passphrase.into(),
            fee: BASE_FEE,
            memo: None,
            operations: Vec::with_capacity(1),
            timeout: DEFAULT_TX_TIMEOUT,
        }
    }

    /// Sets the inclusion fee in stroops (defaults to [`BASE_FEE`])
    pub fn fee(mut self, fee: u32) -> Self {
        self.fee = fee;
        self
    }

    pub fn memo(mut self, memo: Memo) -> Self {
        self.memo = Some(memo);
        self
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Sets the validity window in seconds from now (defaults to
    /// [`DEFAULT_TX_TIMEOUT`])
    pub fn timeout(mut self, seconds: i64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn build(self) -> Result<Transaction, BuilderError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.build_at(now)
    }

    /// Builds with an explicit current unix time
    pub fn build_at(mut self, now: u64) -> Result<Transaction, BuilderError> {
        if self.account.account_id.is_contract() {
            return Err(BuilderError::ContractSource(self.account.account_id))
        }
        if self.fee == 0 {
            return Err(BuilderError::InvalidFee)
        }
        if self.timeout <= 0 {
            return Err(BuilderError::InvalidTimeout(self.timeout))
        }
        if let Some(Memo::Text(text)) = &self.memo {
            if text.len() > MAX_MEMO_TEXT_LEN {
                return Err(BuilderError::MemoTooLong(text.len()))
            }
        }
        if self.operations.len() > 1 {
            return Err(BuilderError::TooManyOperations)
        }
        let operation = self.operations.pop().ok_or(BuilderError::MissingOperation)?;
        let sequence = self.account.sequence.checked_add(1).ok_or(BuilderError::SequenceOverflow)?;

        Ok(Transaction {
            source: self.account.account_id,
            sequence,
            fee: self.fee,
            memo: self.memo,
            operation,
            time_bounds: TimeBounds { min_time: 0, max_time: now.saturating_add(self.timeout as u64) },
            soroban_data: None,
            network_passphrase: self.network_passphrase,
        })
    }
}
