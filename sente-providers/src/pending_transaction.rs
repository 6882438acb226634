use crate::{JsonRpcClient, LedgerClient, PinBoxFut, Provider, ProviderError};
use pin_project::pin_project;
use sente_core::{
    types::{
        Failure, FailureKind, GetTransactionResponse, TransactionOutcome, TransactionStatus, TxHash,
    },
    value::ContractValue,
};
use std::{
    fmt,
    future::Future,
    ops::Deref,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};
use tokio::time::{sleep, sleep_until, Instant, Sleep};

/// Time between two status queries
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Upper bound on the total wait for a terminal status
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(30_000);

/// A pending transaction is a transaction which has been submitted but has
/// not reached a terminal status yet.
///
/// `await`ing it queries the status immediately and then once per interval.
/// It resolves to [`TransactionOutcome::Success`] with the contract's return
/// value, [`TransactionOutcome::Failed`] when execution failed, or
/// [`TransactionOutcome::TimedOut`] once `max_wait` has elapsed since
/// submission, including when a status query is still unanswered at that
/// point. `NOT_FOUND` is treated like `PENDING`. Transport errors while
/// polling are returned as errors, and so is a committed transaction whose
/// return value cannot be decoded.
#[pin_project]
#[must_use = "pending transactions do nothing unless awaited"]
pub struct PendingTransaction<'a, P, L> {
    tx_hash: TxHash,
    interval: Duration,
    max_wait: Duration,
    submitted_at: Instant,
    deadline: Pin<Box<Sleep>>,
    polls: usize,
    provider: &'a Provider<P, L>,
    state: PendingTxState<'a>,
}

impl<'a, P: JsonRpcClient, L: LedgerClient> PendingTransaction<'a, P, L> {
    /// Creates a new pending transaction poller from a hash and a provider
    pub fn new(tx_hash: TxHash, provider: &'a Provider<P, L>) -> Self {
        let fut = Box::pin(provider.get_transaction(tx_hash));
        let submitted_at = Instant::now();
        Self {
            tx_hash,
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            submitted_at,
            deadline: Box::pin(sleep_until(submitted_at + DEFAULT_MAX_WAIT)),
            polls: 0,
            provider,
            state: PendingTxState::GettingStatus(fut),
        }
    }

    /// Sets the time between two status queries
    pub fn interval<T: Into<Duration>>(mut self, duration: T) -> Self {
        self.interval = duration.into();
        self
    }

    /// Sets the maximum time to wait for a terminal status, measured from
    /// submission
    pub fn max_wait<T: Into<Duration>>(mut self, duration: T) -> Self {
        self.max_wait = duration.into();
        self.deadline.as_mut().reset(self.submitted_at + self.max_wait);
        self
    }

    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }
}

macro_rules! completed {
    ($this:ident, $output:expr) => {
        *$this.state = PendingTxState::Completed;
        return Poll::Ready($output)
    };
}

macro_rules! rewake_with_new_state {
    ($ctx:ident, $this:ident, $new_state:expr) => {
        *$this.state = $new_state;
        $ctx.waker().wake_by_ref();
        return Poll::Pending
    };
}

fn outcome(
    hash: TxHash,
    response: GetTransactionResponse,
) -> Result<TransactionOutcome<ContractValue>, ProviderError> {
    match response.status {
        TransactionStatus::Success => match response.return_value() {
            Ok(value) => Ok(TransactionOutcome::Success(value)),
            Err(source) => Err(ProviderError::UndecodableReturnValue { hash, source }),
        },
        _ => {
            let code = response.result_code().map(|code| format!(": {code}")).unwrap_or_default();
            Ok(TransactionOutcome::Failed(Failure::new(
                FailureKind::Execution,
                response.status.to_string(),
                format!("transaction {hash} finished with status {}{code}", response.status),
            )))
        }
    }
}

impl<'a, P: JsonRpcClient, L: LedgerClient> Future for PendingTransaction<'a, P, L> {
    type Output = Result<TransactionOutcome<ContractValue>, ProviderError>;

    fn poll(self: Pin<&mut Self>, ctx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        match this.state {
            PendingTxState::PausedGettingStatus(delay) => {
                futures_util::ready!(delay.as_mut().poll(ctx));
                let provider: &'a Provider<P, L> = this.provider;
                let fut = Box::pin(provider.get_transaction(*this.tx_hash));
                rewake_with_new_state!(ctx, this, PendingTxState::GettingStatus(fut));
            }
            PendingTxState::GettingStatus(fut) => {
                let response = match fut.as_mut().poll(ctx) {
                    Poll::Ready(Ok(response)) => response,
                    Poll::Ready(Err(err)) => {
                        completed!(this, Err(err));
                    }
                    Poll::Pending => {
                        // an unanswered query does not extend the wait
                        if this.deadline.as_mut().poll(ctx).is_ready() {
                            tracing::debug!(hash = %this.tx_hash, "status query unanswered at the deadline");
                            completed!(this, Ok(TransactionOutcome::TimedOut(*this.tx_hash)));
                        }
                        return Poll::Pending
                    }
                };
                *this.polls += 1;
                tracing::trace!(
                    hash = %this.tx_hash,
                    status = %response.status,
                    polls = *this.polls,
                    "polled transaction status"
                );

                if response.status.is_terminal() {
                    completed!(this, outcome(*this.tx_hash, response));
                }

                let elapsed = this.submitted_at.elapsed();
                if elapsed >= *this.max_wait {
                    tracing::debug!(hash = %this.tx_hash, ?elapsed, "gave up waiting for transaction");
                    completed!(this, Ok(TransactionOutcome::TimedOut(*this.tx_hash)));
                }

                let delay = (*this.interval).min(*this.max_wait - elapsed);
                rewake_with_new_state!(
                    ctx,
                    this,
                    PendingTxState::PausedGettingStatus(Box::pin(sleep(delay)))
                );
            }
            PendingTxState::Completed => {
                panic!("polled pending transaction future after completion")
            }
        }
    }
}

impl<'a, P, L> fmt::Debug for PendingTransaction<'a, P, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTransaction")
            .field("tx_hash", &self.tx_hash)
            .field("interval", &self.interval)
            .field("max_wait", &self.max_wait)
            .field("polls", &self.polls)
            .field("state", &self.state)
            .finish()
    }
}

impl<'a, P, L> PartialEq for PendingTransaction<'a, P, L> {
    fn eq(&self, other: &Self) -> bool {
        self.tx_hash == other.tx_hash
    }
}

impl<'a, P, L> PartialEq<TxHash> for PendingTransaction<'a, P, L> {
    fn eq(&self, other: &TxHash) -> bool {
        &self.tx_hash == other
    }
}

impl<'a, P, L> Eq for PendingTransaction<'a, P, L> {}

impl<'a, P, L> Deref for PendingTransaction<'a, P, L> {
    type Target = TxHash;

    fn deref(&self) -> &Self::Target {
        &self.tx_hash
    }
}

// We box the futures for each state so that the PendingTransaction
// struct is not generic over the futures' types
enum PendingTxState<'a> {
    /// Waiting for the interval to elapse before querying again
    PausedGettingStatus(Pin<Box<Sleep>>),

    /// Polling the endpoint for the transaction's status
    GettingStatus(PinBoxFut<'a, GetTransactionResponse>),

    /// Future has completed and should panic if polled again
    Completed,
}

impl<'a> fmt::Debug for PendingTxState<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            PendingTxState::PausedGettingStatus(_) => "PausedGettingStatus",
            PendingTxState::GettingStatus(_) => "GettingStatus",
            PendingTxState::Completed => "Completed",
        };
        f.write_str(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockLedger, MockResponse};
    use async_trait::async_trait;
    use sente_core::{
        stellar_xdr::curr::{ScVal, TransactionMeta, TransactionResultResult},
        types::TESTNET_PASSPHRASE,
    };
    use serde::{de::DeserializeOwned, Serialize};
    use serde_json::{json, Value};

    /// An execution endpoint that accepts requests and never answers them
    #[derive(Debug)]
    struct Unresponsive;

    #[async_trait]
    impl JsonRpcClient for Unresponsive {
        type Error = ProviderError;

        async fn request<T, R>(&self, _method: &str, _params: T) -> Result<R, ProviderError>
        where
            T: fmt::Debug + Serialize + Send + Sync,
            R: DeserializeOwned + Send,
        {
            futures_util::future::pending().await
        }
    }

    fn hash() -> TxHash {
        TxHash([0x1f; 32])
    }

    fn status(status: &str) -> Value {
        json!({"status": status, "latestLedger": 100})
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_after_two_intervals() {
        let (provider, mock, _) = Provider::mocked();
        mock.push::<Value, _>(status("NOT_FOUND")).unwrap();
        mock.push::<Value, _>(status("NOT_FOUND")).unwrap();
        mock.push(GetTransactionResponse::success(101, 101, &ContractValue::I128(42)).unwrap())
            .unwrap();

        let start = Instant::now();
        let outcome = PendingTransaction::new(hash(), &provider)
            .interval(Duration::from_millis(1000))
            .await
            .unwrap();

        assert_eq!(outcome, TransactionOutcome::Success(ContractValue::I128(42)));
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
        assert_eq!(mock.requests(), vec!["getTransaction"; 3]);
        mock.assert_request("getTransaction", json!({ "hash": hash() })).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_at_max_wait() {
        let (provider, mock, _) = Provider::mocked();
        for _ in 0..10 {
            mock.push::<Value, _>(status("PENDING")).unwrap();
        }

        let start = Instant::now();
        let outcome = PendingTransaction::new(hash(), &provider)
            .interval(Duration::from_millis(1000))
            .max_wait(Duration::from_millis(2000))
            .await
            .unwrap();

        assert_eq!(outcome, TransactionOutcome::TimedOut(hash()));
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
        // immediately, after 1s and after 2s
        assert_eq!(mock.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn last_poll_lands_on_the_deadline() {
        let (provider, mock, _) = Provider::mocked();
        for _ in 0..10 {
            mock.push::<Value, _>(status("NOT_FOUND")).unwrap();
        }

        let start = Instant::now();
        let outcome = PendingTransaction::new(hash(), &provider)
            .interval(Duration::from_millis(1000))
            .max_wait(Duration::from_millis(2500))
            .await
            .unwrap();

        assert!(matches!(outcome, TransactionOutcome::TimedOut(_)));
        assert_eq!(start.elapsed(), Duration::from_millis(2500));
        assert_eq!(mock.requests().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_carries_diagnostic() {
        let (provider, mock, _) = Provider::mocked();
        mock.push::<Value, _>(status("PENDING")).unwrap();
        mock.push(GetTransactionResponse::failed(
            120,
            120,
            TransactionResultResult::TxFailed(Default::default()),
        ))
        .unwrap();

        let outcome = PendingTransaction::new(hash(), &provider).await.unwrap();
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Execution);
        assert_eq!(failure.status, "FAILED");
        assert!(failure.diagnostic.contains("FAILED: TxFailed"));
    }

    #[tokio::test(start_paused = true)]
    async fn unanswered_query_times_out_at_max_wait() {
        let provider = Provider::new(Unresponsive, MockLedger::default(), TESTNET_PASSPHRASE);

        let start = Instant::now();
        let outcome = PendingTransaction::new(hash(), &provider)
            .max_wait(Duration::from_millis(2000))
            .await
            .unwrap();

        assert_eq!(outcome, TransactionOutcome::TimedOut(hash()));
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn undecodable_success_is_not_a_failure() {
        let (provider, mock, _) = Provider::mocked();
        let mut done = GetTransactionResponse::success(7, 7, &ContractValue::Void).unwrap();
        if let Some(TransactionMeta::V3(meta)) = &mut done.result_meta {
            if let Some(soroban) = &mut meta.soroban_meta {
                soroban.return_value = ScVal::Vec(None);
            }
        }
        mock.push(done).unwrap();

        let err = PendingTransaction::new(hash(), &provider).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::UndecodableReturnValue { hash: h, .. } if h == hash()
        ));
        assert!(err.to_string().contains("committed"));
    }

    #[tokio::test(start_paused = true)]
    async fn transport_errors_propagate() {
        let (provider, mock, _) = Provider::mocked();
        mock.push::<Value, _>(status("NOT_FOUND")).unwrap();
        mock.push_response(MockResponse::Error(crate::JsonRpcError {
            code: -32603,
            message: "internal error".to_owned(),
            data: None,
        }));

        let err = PendingTransaction::new(hash(), &provider).await.unwrap_err();
        assert!(err.to_string().contains("internal error"));
    }
}
