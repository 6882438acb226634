use super::TxHash;
use std::fmt;

/// The phase of the pipeline a failure originates from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Configuration,
    Simulation,
    Signer,
    Submission,
    /// The transaction was included but its execution failed
    Execution,
    Codec,
    Transport,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Why an invocation did not succeed. `diagnostic` is the original error text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub status: String,
    pub diagnostic: String,
}

impl Failure {
    pub fn new(kind: FailureKind, status: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self { kind, status: status.into(), diagnostic: diagnostic.into() }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.status, self.kind, self.diagnostic)
    }
}

impl std::error::Error for Failure {}

/// The result of every invocation.
///
/// `TimedOut` means the outcome is unknown, not that the transaction failed:
/// its hash can be queried again later.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum TransactionOutcome<T> {
    Success(T),
    Failed(Failure),
    TimedOut(TxHash),
}

impl<T> TransactionOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, TransactionOutcome::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            TransactionOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            TransactionOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> TransactionOutcome<U> {
        match self {
            TransactionOutcome::Success(value) => TransactionOutcome::Success(f(value)),
            TransactionOutcome::Failed(failure) => TransactionOutcome::Failed(failure),
            TransactionOutcome::TimedOut(hash) => TransactionOutcome::TimedOut(hash),
        }
    }
}

impl<T> From<Failure> for TransactionOutcome<T> {
    fn from(failure: Failure) -> Self {
        TransactionOutcome::Failed(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_keeps_failures() {
        let failed: TransactionOutcome<u32> =
            Failure::new(FailureKind::Execution, "FAILED", "trapped").into();
        let mapped = failed.map(|v| v + 1);
        assert_eq!(mapped.failure().unwrap().to_string(), "FAILED (Execution): trapped");
        assert_eq!(TransactionOutcome::Success(1).map(|v| v + 1).success(), Some(2));
    }
}
