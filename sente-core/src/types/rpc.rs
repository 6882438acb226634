//! Responses of the execution and ledger endpoints
use super::{xdr::base64_xdr_opt, TxHash};
use crate::value::{CodecError, ContractValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use stellar_xdr::curr::{
    ExtensionPoint, LedgerEntryChanges, ScVal, SorobanTransactionMeta, SorobanTransactionMetaExt,
    TransactionMeta, TransactionMetaV3, TransactionResult, TransactionResultExt,
    TransactionResultResult,
};

/// Immediate status of `sendTransaction`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendTransactionStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

impl fmt::Display for SendTransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SendTransactionStatus::Pending => "PENDING",
            SendTransactionStatus::Duplicate => "DUPLICATE",
            SendTransactionStatus::TryAgainLater => "TRY_AGAIN_LATER",
            SendTransactionStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResponse {
    pub status: SendTransactionStatus,
    pub hash: TxHash,
    pub latest_ledger: u32,
    /// Why the transaction was refused when the status is `ERROR`
    #[serde(
        default,
        rename = "errorResultXdr",
        with = "base64_xdr_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_result: Option<TransactionResult>,
}

impl SendTransactionResponse {
    /// The refusal's result code, e.g. `TxBadSeq`
    pub fn result_code(&self) -> Option<&'static str> {
        self.error_result.as_ref().map(|result| result.result.name())
    }
}

/// A result without operation results, carrying just the transaction level code
pub fn transaction_result(result: TransactionResultResult) -> TransactionResult {
    TransactionResult { fee_charged: 0, result, ext: TransactionResultExt::V0 }
}

/// Status of a submitted transaction as reported by `getTransaction`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Not yet seen by the endpoint; treated like `Pending`
    NotFound,
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Success | TransactionStatus::Failed)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionStatus::NotFound => "NOT_FOUND",
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResponse {
    pub status: TransactionStatus,
    pub latest_ledger: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<u32>,
    #[serde(
        default,
        rename = "resultXdr",
        with = "base64_xdr_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<TransactionResult>,
    #[serde(
        default,
        rename = "resultMetaXdr",
        with = "base64_xdr_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub result_meta: Option<TransactionMeta>,
}

impl GetTransactionResponse {
    /// A response carrying only a status, e.g. `NOT_FOUND` while in flight
    pub fn with_status(status: TransactionStatus, latest_ledger: u32) -> Self {
        Self { status, latest_ledger, ledger: None, result: None, result_meta: None }
    }

    /// A committed invocation that returned `value`
    pub fn success(latest_ledger: u32, ledger: u32, value: &ContractValue) -> Result<Self, CodecError> {
        let meta = TransactionMeta::V3(TransactionMetaV3 {
            ext: ExtensionPoint::V0,
            tx_changes_before: LedgerEntryChanges(Default::default()),
            operations: Default::default(),
            tx_changes_after: LedgerEntryChanges(Default::default()),
            soroban_meta: Some(SorobanTransactionMeta {
                ext: SorobanTransactionMetaExt::V0,
                events: Default::default(),
                return_value: ScVal::try_from(value)?,
                diagnostic_events: Default::default(),
            }),
        });
        Ok(Self {
            status: TransactionStatus::Success,
            latest_ledger,
            ledger: Some(ledger),
            result: Some(transaction_result(TransactionResultResult::TxSuccess(Default::default()))),
            result_meta: Some(meta),
        })
    }

    /// A transaction included in `ledger` that failed with `result`
    pub fn failed(latest_ledger: u32, ledger: u32, result: TransactionResultResult) -> Self {
        Self {
            status: TransactionStatus::Failed,
            latest_ledger,
            ledger: Some(ledger),
            result: Some(transaction_result(result)),
            result_meta: None,
        }
    }

    /// The invocation's return value; `Void` when the meta carries none
    pub fn return_value(&self) -> Result<ContractValue, CodecError> {
        match &self.result_meta {
            Some(TransactionMeta::V3(TransactionMetaV3 { soroban_meta: Some(meta), .. })) => {
                ContractValue::try_from(meta.return_value.clone())
            }
            _ => Ok(ContractValue::Void),
        }
    }

    /// The transaction result code, e.g. `TxFailed`
    pub fn result_code(&self) -> Option<&'static str> {
        self.result.as_ref().map(|result| result.result.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNetworkResponse {
    pub passphrase: String,
    pub protocol_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendbot_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestLedger {
    pub id: String,
    pub protocol_version: u32,
    pub sequence: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Receipt of a synchronous submission to the ledger endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub hash: TxHash,
    pub ledger: u32,
    pub successful: bool,
}
