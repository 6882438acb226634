use crate::{Client, ContractError};
use sente_core::{
    types::{
        transaction::{assemble, TransactionBuilder, CONTRACT_FEE, DEFAULT_TX_TIMEOUT},
        Address, InvokeContract, Memo, Operation, SimulationSuccess, Transaction,
        TransactionOutcome,
    },
    value::FromContractValue,
};
use sente_providers::{
    JsonRpcClient, LedgerClient, ProviderError, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL,
};
use sente_signers::{CancelRegistration, ExternalSigner};
use std::{fmt::Debug, marker::PhantomData, time::Duration};
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
#[must_use = "contract calls do nothing unless you `send` or `call` them"]
/// Helper for managing a contract invocation before submitting it
pub struct ContractCall<P, L, S, D> {
    /// The function being called and its encoded arguments
    pub invocation: InvokeContract,
    /// The account the transaction is sent from
    pub from: Option<Address>,
    /// Declared inclusion fee, in stroops
    pub fee: u32,
    /// Seconds until the transaction expires
    pub timeout: i64,
    pub memo: Option<Memo>,
    pub poll_interval: Duration,
    pub max_wait: Duration,
    pub(crate) cancel: Option<CancelRegistration>,
    pub(crate) client: Client<P, L, S>,
    pub(crate) datatype: PhantomData<D>,
}

impl<P, L, S, D> ContractCall<P, L, S, D> {
    pub(crate) fn new(client: Client<P, L, S>, invocation: InvokeContract) -> Self {
        Self {
            invocation,
            from: None,
            fee: CONTRACT_FEE,
            timeout: DEFAULT_TX_TIMEOUT,
            memo: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            cancel: None,
            client,
            datatype: PhantomData,
        }
    }

    /// Sets the source account of the transaction
    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the declared inclusion fee. Defaults to [`CONTRACT_FEE`].
    pub fn fee(mut self, fee: u32) -> Self {
        self.fee = fee;
        self
    }

    /// Sets the expiration window in seconds. Defaults to 180.
    pub fn timeout(mut self, seconds: i64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn memo(mut self, memo: Memo) -> Self {
        self.memo = Some(memo);
        self
    }

    /// Sets the time between two status queries. Defaults to one second.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bounds the wait for a terminal status. Defaults to 30 seconds.
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Allows the wait for the signer to be cancelled
    pub fn cancel_on(mut self, registration: CancelRegistration) -> Self {
        self.cancel = Some(registration);
        self
    }
}

impl<P, L, S, D> ContractCall<P, L, S, D>
where
    P: JsonRpcClient,
    L: LedgerClient,
    S: ExternalSigner,
    D: FromContractValue + Debug,
{
    /// Builds the unsigned transaction from a fresh snapshot of the source
    /// account
    pub async fn build(&self) -> Result<Transaction, ContractError> {
        let from = self.from.ok_or(ContractError::MissingSender)?;
        let provider = self.client.provider();
        let account = provider.load_account(&from).await?;

        let mut builder = TransactionBuilder::new(account, provider.network_passphrase())
            .fee(self.fee)
            .timeout(self.timeout)
            .operation(Operation::InvokeContract(self.invocation.clone()));
        if let Some(memo) = &self.memo {
            builder = builder.memo(memo.clone());
        }
        Ok(builder.build()?)
    }

    /// Builds and dry-runs the transaction
    pub async fn simulate(&self) -> Result<(Transaction, SimulationSuccess), ContractError> {
        let tx = self.build().await?;
        let simulation = self.client.provider().simulate_transaction(&tx).await?.into_result()?;
        Ok((tx, simulation))
    }

    /// Answers the call from a simulation alone.
    ///
    /// Nothing is signed or submitted, so this is how read-only functions are
    /// queried. On a state-mutating function it returns what the call would
    /// return without changing any state.
    #[instrument(skip(self), fields(contract = %self.invocation.contract, function = %self.invocation.function))]
    pub async fn call(&self) -> Result<D, ContractError> {
        let (_, simulation) = self.simulate().await?;
        let value = D::from_contract_value(simulation.return_value)?;
        debug!(?value, "read from simulation");
        Ok(value)
    }

    /// Runs the whole pipeline: build, simulate, assemble, sign, submit and
    /// wait for a terminal status.
    ///
    /// A simulation error stops the pipeline before anything is signed. The
    /// transaction is submitted at most once.
    #[instrument(skip(self), fields(contract = %self.invocation.contract, function = %self.invocation.function))]
    pub async fn send(mut self) -> Result<TransactionOutcome<D>, ContractError> {
        let cancel = self.cancel.take();
        let (tx, simulation) = self.simulate().await?;
        let tx = assemble(tx, &simulation)?;
        debug!(fee = tx.fee, resource_fee = simulation.min_resource_fee, "transaction assembled");

        let signed = self.client.gateway().sign_transaction(&tx, cancel).await?;
        let pending = self.client.provider().send_transaction(&signed).await?;
        info!(hash = %signed.hash(), "transaction submitted");

        let hash = pending.tx_hash();
        let outcome = match pending.interval(self.poll_interval).max_wait(self.max_wait).await {
            Ok(outcome) => outcome,
            Err(ProviderError::UndecodableReturnValue { hash, source }) => {
                warn!(%hash, %source, "transaction committed with an undecodable return value");
                return Err(ContractError::Committed { hash, source })
            }
            Err(err) => return Err(err.into()),
        };
        Ok(match outcome {
            TransactionOutcome::Success(value) => match D::from_contract_value(value) {
                Ok(value) => TransactionOutcome::Success(value),
                Err(source) => {
                    warn!(%hash, %source, "transaction committed with an unexpected return value");
                    return Err(ContractError::Committed { hash, source })
                }
            },
            TransactionOutcome::Failed(failure) => {
                warn!(%failure, "transaction failed");
                TransactionOutcome::Failed(failure)
            }
            TransactionOutcome::TimedOut(hash) => {
                warn!(%hash, "no terminal status before the deadline");
                TransactionOutcome::TimedOut(hash)
            }
        })
    }

    /// Like [`ContractCall::send`], with every error reported as
    /// [`TransactionOutcome::Failed`] carrying the error's message
    pub async fn invoke(self) -> TransactionOutcome<D> {
        match self.send().await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%err, "invocation failed");
                TransactionOutcome::Failed(err.into())
            }
        }
    }
}
