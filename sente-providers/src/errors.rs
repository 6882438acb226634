use std::{error::Error, fmt::Debug};
use thiserror::Error;

use crate::JsonRpcError;
use sente_core::{
    types::{EnvelopeError, TxHash},
    value::CodecError,
};

/// An `RpcError` is an abstraction over error types returned by a
/// [`crate::JsonRpcClient`] or a [`crate::LedgerClient`].
///
/// All clients can return [`JsonRpcError`] responses, as well as serde
/// deserialization errors. Because client errors are type-erased via the
/// [`ProviderError`], this trait provides access to the underlying error types.
pub trait RpcError: Error + Debug + Send + Sync {
    /// Access an underlying JSON-RPC error (if any)
    fn as_error_response(&self) -> Option<&JsonRpcError>;

    /// Returns `true` if the underlying error is a JSON-RPC error response
    fn is_error_response(&self) -> bool {
        self.as_error_response().is_some()
    }

    /// Access an underlying `serde_json` error (if any)
    fn as_serde_error(&self) -> Option<&serde_json::Error>;

    /// Returns `true` if the underlying error is a serde_json (de)serialization
    /// error
    fn is_serde_error(&self) -> bool {
        self.as_serde_error().is_some()
    }
}

/// Why an endpoint refused a transaction. Every variant requires rebuilding
/// the transaction from a fresh account snapshot before trying again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("fee too low: {code}")]
    InsufficientFee { code: String },
    #[error("bad sequence number: {code}")]
    DuplicateSequence { code: String },
    #[error("transaction {0} was already submitted")]
    DuplicateSubmission(TxHash),
    #[error("rejected by the network with status {status}{}", fmt_code(.code))]
    NetworkRejected { status: String, code: Option<String> },
}

fn fmt_code(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" ({c})")).unwrap_or_default()
}

impl SubmissionError {
    /// Maps a submission status and result code onto the taxonomy.
    ///
    /// Accepts both the execution endpoint's XDR name (`TxBadSeq`) and the ledger
    /// endpoint's (`tx_bad_seq`) spelling of result codes.
    pub fn from_result_code(status: &str, code: Option<&str>) -> Self {
        let normalized = code.map(|c| c.replace('_', "").to_ascii_lowercase());
        match normalized.as_deref() {
            Some("txinsufficientfee") => {
                SubmissionError::InsufficientFee { code: code.unwrap_or_default().to_owned() }
            }
            Some("txbadseq") => {
                SubmissionError::DuplicateSequence { code: code.unwrap_or_default().to_owned() }
            }
            _ => SubmissionError::NetworkRejected {
                status: status.to_owned(),
                code: code.map(ToOwned::to_owned),
            },
        }
    }
}

#[derive(Debug, Error)]
/// An error thrown when making a call to the provider
pub enum ProviderError {
    /// An internal error in the JSON RPC Client
    #[error("{0}")]
    JsonRpcClientError(Box<dyn crate::RpcError + Send + Sync>),

    /// An internal error in the ledger client
    #[error("{0}")]
    LedgerClientError(Box<dyn crate::RpcError + Send + Sync>),

    /// The ledger endpoint does not know the account
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// The transaction was refused at submission
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// The execution endpoint serves a different network than configured
    #[error("network mismatch: expected `{expected}`, endpoint reports `{actual}`")]
    NetworkMismatch { expected: String, actual: String },

    /// Error in underlying lib `serde_json`
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// A transaction envelope could not be encoded or decoded
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// The transaction committed, only its return value could not be decoded
    #[error("transaction {hash} committed but its return value could not be decoded: {source}")]
    UndecodableReturnValue { hash: TxHash, source: CodecError },

    /// Error in underlying lib `reqwest`
    #[error(transparent)]
    HTTPError(#[from] reqwest::Error),

    /// Custom error from unknown source
    #[error("custom error: {0}")]
    CustomError(String),
}

impl ProviderError {
    /// Whether the error is a refusal that requires a rebuilt transaction
    pub fn is_submission_error(&self) -> bool {
        matches!(self, ProviderError::Submission(_))
    }
}

impl RpcError for ProviderError {
    fn as_error_response(&self) -> Option<&JsonRpcError> {
        match self {
            ProviderError::JsonRpcClientError(err) | ProviderError::LedgerClientError(err) => {
                err.as_error_response()
            }
            _ => None,
        }
    }

    fn as_serde_error(&self) -> Option<&serde_json::Error> {
        match self {
            ProviderError::JsonRpcClientError(e) | ProviderError::LedgerClientError(e) => {
                e.as_serde_error()
            }
            ProviderError::SerdeJson(e) => Some(e),
            _ => None,
        }
    }
}
