use sente_core::types::EnvelopeError;
use thiserror::Error;

/// Code reported by wallets when the user declined the request
pub const USER_REJECTED_CODE: i64 = 4001;

/// Code reported by wallets when another request is already waiting on the user
pub const REQUEST_PENDING_CODE: i64 = -32002;

#[derive(Error, Debug)]
/// Errors produced while talking to an external signer
pub enum SignerError {
    /// The user explicitly declined
    #[error("user rejected the request")]
    UserRejected,

    /// The wallet is not installed or is locked
    #[error("signer unavailable: {0}")]
    Unavailable(String),

    /// A request is already waiting on the user
    #[error("a signing request is already pending")]
    Busy,

    #[error("signing request cancelled")]
    Cancelled,

    /// The signed encoding is not the transaction that was sent for signing
    #[error("signed transaction does not match the transaction sent for signing")]
    Mismatch,

    #[error("signed transaction carries no signature")]
    MissingSignature,

    /// The signer returned something that is not an envelope
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("signer error {code}: {message}")]
    Other { code: i64, message: String },
}

impl SignerError {
    /// Maps a wallet error code onto the taxonomy
    pub fn from_code(code: i64, message: impl Into<String>) -> Self {
        match code {
            USER_REJECTED_CODE => SignerError::UserRejected,
            REQUEST_PENDING_CODE => SignerError::Busy,
            _ => SignerError::Other { code, message: message.into() },
        }
    }

    /// Only a busy wallet may be asked again, after a backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, SignerError::Busy)
    }
}
