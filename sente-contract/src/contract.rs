use crate::{Client, ContractCall, ContractError};
use sente_core::{
    types::{Address, InvokeContract, TransactionOutcome},
    value::{ContractValue, FromContractValue},
};
use sente_providers::{JsonRpcClient, LedgerClient};
use sente_signers::{ExternalSigner, Session};
use std::fmt::{self, Debug};
use tracing::warn;

/// A deployed contract, addressed through a [`Client`].
///
/// ```no_run
/// # use sente_core::{types::Address, value::IntoContractValue};
/// # use sente_contract::{Client, Contract};
/// # use sente_providers::Provider;
/// # use sente_signers::MockSigner;
/// # async fn foo() -> Result<(), Box<dyn std::error::Error>> {
/// # let (provider, _, _) = Provider::mocked();
/// let alice = Address::account([1u8; 32]);
/// let client = Client::new(provider, MockSigner::new(alice));
/// let token = Contract::new(Address::contract([2u8; 32]), client);
///
/// let balance: i128 = token
///     .method("balance", vec![alice.into_contract_value()])
///     .from(alice)
///     .call()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Contract<P, L, S> {
    address: Address,
    client: Client<P, L, S>,
}

impl<P, L, S> Clone for Contract<P, L, S> {
    fn clone(&self) -> Self {
        Self { address: self.address, client: self.client.clone() }
    }
}

impl<P: Debug, L: Debug, S: Debug> Debug for Contract<P, L, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract")
            .field("address", &self.address)
            .field("client", &self.client)
            .finish()
    }
}

impl<P, L, S> Contract<P, L, S> {
    pub fn new(address: Address, client: Client<P, L, S>) -> Self {
        Self { address, client }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn client(&self) -> &Client<P, L, S> {
        &self.client
    }

    /// Returns a call to `function` with already encoded arguments
    pub fn method<D>(&self, function: &str, args: Vec<ContractValue>) -> ContractCall<P, L, S, D> {
        ContractCall::new(
            self.client.clone(),
            InvokeContract::new(self.address, function, args),
        )
    }
}

impl<P, L, S> Contract<P, L, S>
where
    P: JsonRpcClient,
    L: LedgerClient,
    S: ExternalSigner,
{
    /// Queries a read-only function, degrading to `fallback` on any error
    pub async fn read_or<D>(
        &self,
        session: &Session,
        function: &str,
        args: Vec<ContractValue>,
        fallback: D,
    ) -> D
    where
        D: FromContractValue + Debug,
    {
        let result = match session.active_account() {
            Ok(from) => self.method::<D>(function, args).from(from).call().await,
            Err(err) => Err(ContractError::from(err)),
        };
        result.unwrap_or_else(|err| {
            warn!(contract = %self.address, function, %err, ?fallback, "read failed, using fallback");
            fallback
        })
    }

    /// Sends a state-mutating call from the session's account. Never retried.
    pub async fn write(
        &self,
        session: &Session,
        function: &str,
        args: Vec<ContractValue>,
    ) -> TransactionOutcome<()> {
        self.write_with(session, function, |_| args).await
    }

    /// Like [`Contract::write`], for arguments that include the sending
    /// account
    pub async fn write_with<F>(
        &self,
        session: &Session,
        function: &str,
        args: F,
    ) -> TransactionOutcome<()>
    where
        F: FnOnce(Address) -> Vec<ContractValue>,
    {
        let from = match session.active_account() {
            Ok(from) => from,
            Err(err) => return TransactionOutcome::Failed(ContractError::from(err).into()),
        };
        self.method::<()>(function, args(from)).from(from).invoke().await
    }
}
