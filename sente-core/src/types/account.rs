use super::{serde_helpers::stringified, Address};
use serde::{Deserialize, Serialize};

/// A snapshot of an account's ledger state.
///
/// The snapshot is fetched right before building a transaction and is consumed
/// by the builder, so each fetched value builds exactly one transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: Address,
    /// Current sequence number; the next transaction must use `sequence + 1`
    #[serde(with = "stringified")]
    pub sequence: i64,
    #[serde(default)]
    pub balances: Vec<Balance>,
}

/// A single balance line of an account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// `native` for lumens, `credit_alphanum4` / `credit_alphanum12` otherwise
    pub asset_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    /// Decimal string with 7 fractional digits
    pub balance: String,
}

impl Account {
    pub fn new(account_id: Address, sequence: i64) -> Self {
        Self { account_id, sequence, balances: Vec::new() }
    }

    /// Sets the native balance of the snapshot
    #[must_use]
    pub fn with_native_balance(mut self, balance: impl Into<String>) -> Self {
        self.balances.retain(|b| b.asset_type != "native");
        self.balances.push(Balance {
            asset_type: "native".to_owned(),
            asset_code: None,
            balance: balance.into(),
        });
        self
    }

    /// The native (lumen) balance, if the account holds one
    pub fn native_balance(&self) -> Option<&str> {
        self.balances.iter().find(|b| b.asset_type == "native").map(|b| b.balance.as_str())
    }
}
