use crate::ContractError;
use sente_core::types::{Address, Network};
use sente_providers::{JsonRpcClient, LedgerClient, Provider};
use sente_signers::{ExternalSigner, Session, SignerGateway};
use std::{fmt, sync::Arc};
use tracing::debug;

/// The endpoints and the signer every contract call goes through.
///
/// Cloning is cheap: both halves are reference counted.
pub struct Client<P, L, S> {
    provider: Arc<Provider<P, L>>,
    gateway: Arc<SignerGateway<S>>,
}

impl<P, L, S> Clone for Client<P, L, S> {
    fn clone(&self) -> Self {
        Self { provider: self.provider.clone(), gateway: self.gateway.clone() }
    }
}

impl<P: fmt::Debug, L: fmt::Debug, S: fmt::Debug> fmt::Debug for Client<P, L, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("provider", &self.provider)
            .field("gateway", &self.gateway)
            .finish()
    }
}

impl<P, L, S> Client<P, L, S>
where
    P: JsonRpcClient,
    L: LedgerClient,
    S: ExternalSigner,
{
    pub fn new(provider: impl Into<Arc<Provider<P, L>>>, signer: S) -> Self {
        Self { provider: provider.into(), gateway: Arc::new(SignerGateway::new(signer)) }
    }

    pub fn provider(&self) -> &Provider<P, L> {
        &self.provider
    }

    pub fn gateway(&self) -> &SignerGateway<S> {
        &self.gateway
    }

    pub fn signer(&self) -> &S {
        self.gateway.signer()
    }

    /// Connects the wallet and, on the test network, asks the funding
    /// service to fund the account. Funding failures are not errors: the
    /// account is usually funded already.
    pub async fn connect_session(&self, session: &mut Session) -> Result<Address, ContractError> {
        let account = session.connect(self.signer()).await?;
        if session.expected_network() == Network::Testnet {
            match self.provider.fund_account(&account).await {
                Ok(()) => debug!(%account, "test account funded"),
                Err(err) => debug!(%account, %err, "funding skipped"),
            }
        }
        Ok(account)
    }
}
