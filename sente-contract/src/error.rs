use crate::registry::RegistryError;
use sente_core::{
    types::{
        transaction::{AssembleError, BuilderError},
        Failure, FailureKind, SimulationError, TxHash,
    },
    value::CodecError,
};
use sente_providers::ProviderError;
use sente_signers::{SessionError, SignerError};
use thiserror::Error;

#[derive(Error, Debug)]
/// An Error which is thrown when invoking a contract
pub enum ContractError {
    /// The contract registry has no entry for a contract
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Thrown when there is no account to send from
    #[error("no source account: connect a wallet or set `from`")]
    MissingSender,

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Thrown when the transaction parameters are invalid
    #[error(transparent)]
    Builder(#[from] BuilderError),

    /// The dry run reported an error. Not retried.
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    /// Thrown when an endpoint call fails
    #[error("{0}")]
    ProviderError(#[from] ProviderError),

    /// Thrown when encoding arguments or decoding a simulated return value
    /// fails
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The transaction is on the ledger but its return value could not be
    /// decoded. Sending it again would apply it twice.
    #[error("transaction {hash} committed but its return value could not be decoded: {source}")]
    Committed { hash: TxHash, source: CodecError },
}

impl ContractError {
    /// Whether the same call may be attempted again after a backoff
    pub fn is_retryable(&self) -> bool {
        match self {
            ContractError::Signer(err) | ContractError::Session(SessionError::Signer(err)) => {
                err.is_retryable()
            }
            _ => false,
        }
    }

    /// The hash of a transaction that was applied even though the call
    /// reported an error
    pub fn committed_hash(&self) -> Option<TxHash> {
        match self {
            ContractError::Committed { hash, .. } |
            ContractError::ProviderError(ProviderError::UndecodableReturnValue { hash, .. }) => {
                Some(*hash)
            }
            _ => None,
        }
    }

    /// Whether the transaction has to be rebuilt from a fresh account
    /// snapshot before it can be sent again
    pub fn requires_rebuild(&self) -> bool {
        matches!(self, ContractError::ProviderError(err) if err.is_submission_error())
    }

    /// The pipeline phase this error belongs to
    pub fn kind(&self) -> FailureKind {
        match self {
            ContractError::Registry(_) |
            ContractError::MissingSender |
            ContractError::Builder(_) |
            ContractError::Session(SessionError::NotConnected) |
            ContractError::Session(SessionError::AlreadyConnecting) => FailureKind::Configuration,
            ContractError::Session(SessionError::Signer(_)) | ContractError::Signer(_) => {
                FailureKind::Signer
            }
            ContractError::Simulation(_) | ContractError::Assemble(_) => FailureKind::Simulation,
            ContractError::ProviderError(ProviderError::Submission(_)) => FailureKind::Submission,
            ContractError::ProviderError(ProviderError::Envelope(_)) |
            ContractError::ProviderError(ProviderError::UndecodableReturnValue { .. }) |
            ContractError::Codec(_) |
            ContractError::Committed { .. } => FailureKind::Codec,
            ContractError::ProviderError(_) => FailureKind::Transport,
        }
    }

    fn status(&self) -> &'static str {
        if self.committed_hash().is_some() {
            return "SUCCESS"
        }
        match self.kind() {
            FailureKind::Configuration => "CONFIGURATION_ERROR",
            FailureKind::Simulation => "SIMULATION_FAILED",
            FailureKind::Signer => "SIGNER_ERROR",
            FailureKind::Submission => "SUBMISSION_REJECTED",
            FailureKind::Execution => "FAILED",
            FailureKind::Codec => "CODEC_ERROR",
            FailureKind::Transport => "TRANSPORT_ERROR",
        }
    }
}

impl From<ContractError> for Failure {
    fn from(err: ContractError) -> Self {
        Failure::new(err.kind(), err.status(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sente_core::value::ValueType;
    use sente_providers::SubmissionError;

    #[test]
    fn retry_policy() {
        assert!(ContractError::Signer(SignerError::Busy).is_retryable());
        assert!(!ContractError::Signer(SignerError::UserRejected).is_retryable());

        let rejected = ContractError::ProviderError(
            SubmissionError::from_result_code("400", Some("tx_bad_seq")).into(),
        );
        assert!(rejected.requires_rebuild());
        assert!(!rejected.is_retryable());
        assert_eq!(rejected.kind(), FailureKind::Submission);

        let duplicate: ContractError =
            ProviderError::from(SubmissionError::DuplicateSubmission(TxHash::default())).into();
        assert!(duplicate.requires_rebuild());
    }

    #[test]
    fn committed_calls_are_not_failures_of_the_network() {
        let hash = TxHash([0x11; 32]);
        let err = ContractError::Committed {
            hash,
            source: CodecError::TypeMismatch { expected: ValueType::Void, found: "i128" },
        };
        assert_eq!(err.committed_hash(), Some(hash));
        assert!(!err.requires_rebuild());
        assert!(!err.is_retryable());

        let failure = Failure::from(err);
        assert_eq!(failure.kind, FailureKind::Codec);
        assert_eq!(failure.status, "SUCCESS");
        assert!(failure.diagnostic.starts_with(&format!("transaction {hash} committed")));

        let undecodable: ContractError = ProviderError::UndecodableReturnValue {
            hash,
            source: CodecError::UnsupportedType("vec".to_owned()),
        }
        .into();
        assert_eq!(undecodable.committed_hash(), Some(hash));
        assert_eq!(undecodable.kind(), FailureKind::Codec);
    }

    #[test]
    fn failure_keeps_the_message() {
        let err = ContractError::Simulation(SimulationError {
            message: "HostError: Error(Contract, #1)".to_owned(),
            latest_ledger: 7,
        });
        let failure = Failure::from(err);
        assert_eq!(failure.kind, FailureKind::Simulation);
        assert_eq!(failure.status, "SIMULATION_FAILED");
        assert_eq!(failure.diagnostic, "simulation failed: HostError: Error(Contract, #1)");
    }
}
