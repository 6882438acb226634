use crate::{
    Horizon, Http as HttpProvider, JsonRpcClient, LedgerClient, MockLedger, MockProvider,
    PendingTransaction, ProviderError, SubmissionError,
};

use sente_core::{
    config::NetworkConfig,
    types::{
        Account, Address, GetNetworkResponse, GetTransactionResponse, HealthResponse, LatestLedger,
        SendTransactionResponse, SendTransactionStatus, SignedTransaction, SimulateTransactionResponse,
        SimulationResult, SubmitReceipt, Transaction, TxHash, TESTNET_PASSPHRASE,
    },
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::fmt::Debug;
use tracing::{debug, trace, warn};
use tracing_futures::Instrument;

/// A client for the execution endpoint and the ledger endpoint of one network.
///
/// The provider is read-only after construction and can be shared freely.
#[derive(Clone, Debug)]
pub struct Provider<P, L = Horizon> {
    inner: P,
    ledger: L,
    network_passphrase: String,
}

impl<P: JsonRpcClient, L: LedgerClient> Provider<P, L> {
    /// Instantiate a new provider with an execution transport and a ledger client.
    pub fn new(inner: P, ledger: L, network_passphrase: impl Into<String>) -> Self {
        Self { inner, ledger, network_passphrase: network_passphrase.into() }
    }

    /// The passphrase of the network this provider is configured for
    pub fn network_passphrase(&self) -> &str {
        &self.network_passphrase
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Sends a JSON-RPC request to the execution endpoint
    pub async fn request<T, R>(&self, method: &str, params: T) -> Result<R, ProviderError>
    where
        T: Debug + Serialize + Send + Sync,
        R: Serialize + DeserializeOwned + Debug + Send,
    {
        let span =
            tracing::trace_span!("rpc", method = method, params = ?serde_json::to_string(&params)?);
        // https://docs.rs/tracing/0.1.22/tracing/span/struct.Span.html#in-asynchronous-code
        let res = async move {
            trace!("tx");
            let res: R = self.inner.request(method, params).await.map_err(Into::into)?;
            trace!(rx = ?serde_json::to_string(&res)?);
            Ok::<_, ProviderError>(res)
        }
        .instrument(span)
        .await?;
        Ok(res)
    }

    ////// Ledger endpoint

    /// Fetches a fresh account snapshot. Each snapshot builds one transaction.
    pub async fn load_account(&self, account: &Address) -> Result<Account, ProviderError> {
        let account = self.ledger.load_account(account).await.map_err(Into::into)?;
        debug!(account = %account.account_id, sequence = account.sequence, "loaded account");
        Ok(account)
    }

    /// The native balance of `account` as a decimal string, `"0"` when the
    /// account does not exist or holds no native balance
    pub async fn native_balance(&self, account: &Address) -> Result<String, ProviderError> {
        match self.load_account(account).await {
            Ok(account) => Ok(account.native_balance().unwrap_or("0").to_owned()),
            Err(ProviderError::AccountNotFound(id)) => {
                warn!(account = %id, "account not found, reporting a zero balance");
                Ok("0".to_owned())
            }
            Err(err) => Err(err),
        }
    }

    /// Funds `account` through the test network's funding service
    pub async fn fund_account(&self, account: &Address) -> Result<(), ProviderError> {
        self.ledger.fund_account(account).await.map_err(Into::into)
    }

    /// Submits a signed transaction to the ledger endpoint and waits for its
    /// inclusion. Not idempotent: a transaction must be submitted only once.
    pub async fn submit_raw_transaction(
        &self,
        tx: &SignedTransaction,
    ) -> Result<SubmitReceipt, ProviderError> {
        let receipt =
            self.ledger.submit_transaction(tx.encoded()).await.map_err(Into::into)?;
        debug!(hash = %receipt.hash, ledger = receipt.ledger, "transaction included");
        Ok(receipt)
    }

    ////// Execution endpoint

    /// Dry-runs a transaction. Side-effect free, so it may be repeated.
    pub async fn simulate_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<SimulationResult, ProviderError> {
        let response: SimulateTransactionResponse = self
            .request("simulateTransaction", json!({ "transaction": tx.to_envelope()? }))
            .await?;
        let result = SimulationResult::from(response);
        match &result {
            SimulationResult::Success(success) => debug!(
                min_resource_fee = success.min_resource_fee,
                cpu_insns = success.cost.cpu_insns,
                "simulation succeeded"
            ),
            SimulationResult::Error(err) => debug!(error = %err, "simulation failed"),
        }
        Ok(result)
    }

    /// Submits a signed transaction to the execution endpoint.
    ///
    /// Returns a [`PendingTransaction`] that resolves once the transaction
    /// reaches a terminal status or the wait deadline passes. Refusals are
    /// reported as [`SubmissionError`]s.
    pub async fn send_transaction(
        &self,
        tx: &SignedTransaction,
    ) -> Result<PendingTransaction<'_, P, L>, ProviderError> {
        let response: SendTransactionResponse =
            self.request("sendTransaction", json!({ "transaction": tx.encoded() })).await?;

        if response.hash != tx.hash() {
            warn!(local = %tx.hash(), remote = %response.hash, "endpoint reported a different hash");
        }

        match response.status {
            SendTransactionStatus::Pending => {
                debug!(hash = %response.hash, "transaction submitted");
                Ok(PendingTransaction::new(response.hash, self))
            }
            SendTransactionStatus::Duplicate => {
                Err(SubmissionError::DuplicateSubmission(response.hash).into())
            }
            status => {
                Err(SubmissionError::from_result_code(&status.to_string(), response.result_code())
                    .into())
            }
        }
    }

    /// Gets the current status of a submitted transaction
    pub async fn get_transaction(
        &self,
        hash: TxHash,
    ) -> Result<GetTransactionResponse, ProviderError> {
        self.request("getTransaction", json!({ "hash": hash })).await
    }

    pub async fn get_network(&self) -> Result<GetNetworkResponse, ProviderError> {
        self.request("getNetwork", ()).await
    }

    pub async fn get_latest_ledger(&self) -> Result<LatestLedger, ProviderError> {
        self.request("getLatestLedger", ()).await
    }

    pub async fn get_health(&self) -> Result<HealthResponse, ProviderError> {
        self.request("getHealth", ()).await
    }

    /// Checks that the execution endpoint serves the configured network
    pub async fn verify_network(&self) -> Result<(), ProviderError> {
        let network = self.get_network().await?;
        if network.passphrase != self.network_passphrase {
            return Err(ProviderError::NetworkMismatch {
                expected: self.network_passphrase.clone(),
                actual: network.passphrase,
            })
        }
        Ok(())
    }
}

impl Provider<HttpProvider, Horizon> {
    /// A provider talking to the endpoints of `config` over HTTP
    pub fn from_config(config: &NetworkConfig) -> Self {
        let mut horizon = Horizon::new(config.horizon_url.clone());
        if let Some(friendbot) = &config.friendbot_url {
            horizon = horizon.with_friendbot(friendbot.clone());
        }
        Self::new(HttpProvider::new(config.soroban_rpc_url.clone()), horizon, &config.passphrase)
    }
}

impl Provider<MockProvider, MockLedger> {
    /// Returns a `Provider` instantiated with internal "mock" transports, on
    /// the test network.
    ///
    /// # Example
    ///
    /// ```
    /// # async fn foo() -> Result<(), Box<dyn std::error::Error>> {
    /// use sente_core::types::HealthResponse;
    /// use sente_providers::Provider;
    ///
    /// // Instantiate the provider
    /// let (provider, mock, _ledger) = Provider::mocked();
    /// // Push the mock response
    /// mock.push(HealthResponse { status: "healthy".to_owned() })?;
    /// // Make the call
    /// let health = provider.get_health().await?;
    /// // The response matches
    /// assert_eq!(health.status, "healthy");
    /// // and the request as well!
    /// mock.assert_request("getHealth", ())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn mocked() -> (Self, MockProvider, MockLedger) {
        let mock = MockProvider::new();
        let ledger = MockLedger::new(TESTNET_PASSPHRASE);
        (Self::new(mock.clone(), ledger.clone(), TESTNET_PASSPHRASE), mock, ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockResponse;
    use sente_core::{
        stellar_xdr::curr::{Signature, SignatureHint, TransactionResultResult},
        types::{
            transaction::{TransactionBuilder, CONTRACT_FEE},
            transaction_result, DecoratedSignature, InvokeContract, Operation, Payment,
            TransactionEnvelope,
        },
        value::ContractValue,
    };
    use serde_json::Value;

    fn source() -> Address {
        Address::account([1u8; 32])
    }

    fn sign(tx: &Transaction) -> SignedTransaction {
        let envelope = TransactionEnvelope {
            tx: tx.clone(),
            signatures: vec![DecoratedSignature {
                hint: SignatureHint([0; 4]),
                signature: Signature(vec![0xaa; 64].try_into().unwrap()),
            }],
        };
        SignedTransaction::from_encoded(envelope.to_base64().unwrap(), TESTNET_PASSPHRASE).unwrap()
    }

    fn payment(account: Account) -> Transaction {
        TransactionBuilder::new(account, TESTNET_PASSPHRASE)
            .operation(Operation::Payment(Payment { destination: Address::account([2u8; 32]), amount: 10 }))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn second_build_from_same_snapshot_is_rejected() {
        let (provider, _, ledger) = Provider::mocked();
        ledger.insert_account(Account::new(source(), 41));

        let snapshot = provider.load_account(&source()).await.unwrap();
        let first = sign(&payment(snapshot.clone()));
        let second = sign(&payment(snapshot));

        let receipt = provider.submit_raw_transaction(&first).await.unwrap();
        assert_eq!(receipt.hash, first.hash());
        let err = provider.submit_raw_transaction(&second).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Submission(SubmissionError::DuplicateSequence { .. })
        ));
        assert_eq!(ledger.account(&source()).unwrap().sequence, 42);

        // a fresh snapshot builds a valid transaction again
        let fresh = provider.load_account(&source()).await.unwrap();
        assert!(provider.submit_raw_transaction(&sign(&payment(fresh))).await.is_ok());
    }

    #[tokio::test]
    async fn native_balance_falls_back_to_zero() {
        let (provider, _, ledger) = Provider::mocked();
        assert_eq!(provider.native_balance(&source()).await.unwrap(), "0");

        ledger.insert_account(Account::new(source(), 1).with_native_balance("99.5000000"));
        assert_eq!(provider.native_balance(&source()).await.unwrap(), "99.5000000");

        let other = Address::account([9u8; 32]);
        provider.fund_account(&other).await.unwrap();
        assert_eq!(provider.native_balance(&other).await.unwrap(), "10000.0000000");
    }

    #[tokio::test]
    async fn simulate_reports_both_variants() {
        let (provider, mock, ledger) = Provider::mocked();
        ledger.insert_account(Account::new(source(), 1));
        let tx = TransactionBuilder::new(provider.load_account(&source()).await.unwrap(), TESTNET_PASSPHRASE)
            .fee(CONTRACT_FEE)
            .operation(Operation::InvokeContract(InvokeContract::new(
                Address::contract([3u8; 32]),
                "decimals",
                vec![],
            )))
            .build()
            .unwrap();

        mock.push(SimulateTransactionResponse::success(10, 100, &ContractValue::U32(6)).unwrap())
            .unwrap();
        mock.push(SimulateTransactionResponse::failure(11, "contract not found")).unwrap();

        let success = provider.simulate_transaction(&tx).await.unwrap().into_result().unwrap();
        assert_eq!(success.return_value, ContractValue::U32(6));
        let err = provider.simulate_transaction(&tx).await.unwrap().into_result().unwrap_err();
        assert_eq!(err.message, "contract not found");

        let (method, params) = mock.pop_request().unwrap();
        assert_eq!(method, "simulateTransaction");
        assert_eq!(params["transaction"], tx.to_envelope().unwrap());
    }

    #[tokio::test]
    async fn send_maps_statuses() {
        let (provider, mock, _) = Provider::mocked();
        let signed = sign(&payment(Account::new(source(), 5)));
        let hash = signed.hash();

        mock.push::<Value, _>(json!({"status": "DUPLICATE", "hash": hash, "latestLedger": 3})).unwrap();
        mock.push::<Value, _>(json!({"status": "TRY_AGAIN_LATER", "hash": hash, "latestLedger": 3}))
            .unwrap();
        mock.push(SendTransactionResponse {
            status: SendTransactionStatus::Error,
            hash,
            latest_ledger: 3,
            error_result: Some(transaction_result(TransactionResultResult::TxInsufficientFee)),
        })
        .unwrap();
        mock.push::<Value, _>(json!({"status": "PENDING", "hash": hash, "latestLedger": 3})).unwrap();

        let submission = |err: ProviderError| match err {
            ProviderError::Submission(err) => err,
            other => panic!("unexpected error {other}"),
        };
        assert_eq!(
            submission(provider.send_transaction(&signed).await.unwrap_err()),
            SubmissionError::DuplicateSubmission(hash)
        );
        assert_eq!(
            submission(provider.send_transaction(&signed).await.unwrap_err()),
            SubmissionError::NetworkRejected { status: "TRY_AGAIN_LATER".to_owned(), code: None }
        );
        assert_eq!(
            submission(provider.send_transaction(&signed).await.unwrap_err()),
            SubmissionError::InsufficientFee { code: "TxInsufficientFee".to_owned() }
        );
        let pending = provider.send_transaction(&signed).await.unwrap();
        assert_eq!(*pending, hash);
    }

    #[tokio::test]
    async fn verifies_network_passphrase() {
        let (provider, mock, _) = Provider::mocked();
        mock.push(GetNetworkResponse {
            passphrase: TESTNET_PASSPHRASE.to_owned(),
            protocol_version: 20,
            friendbot_url: None,
        })
        .unwrap();
        mock.push(GetNetworkResponse {
            passphrase: "Public Global Stellar Network ; September 2015".to_owned(),
            protocol_version: 20,
            friendbot_url: None,
        })
        .unwrap();
        provider.verify_network().await.unwrap();
        assert!(matches!(
            provider.verify_network().await.unwrap_err(),
            ProviderError::NetworkMismatch { .. }
        ));
    }

    #[tokio::test]
    async fn transport_errors_surface() {
        let (provider, mock, _) = Provider::mocked();
        mock.push_response(MockResponse::Error(crate::JsonRpcError {
            code: -32601,
            message: "method not found".to_owned(),
            data: None,
        }));
        let err = provider.get_latest_ledger().await.unwrap_err();
        assert_eq!(crate::RpcError::as_error_response(&err).unwrap().code, -32601);
    }
}
