use crate::{ExternalSigner, SignerError};
use sente_core::types::{Address, Network};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Where a wallet connection stands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    /// Waiting for the user to grant access
    Connecting,
    /// `network` is `None` when the wallet did not report one
    Active { account: Address, network: Option<String> },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no wallet connected")]
    NotConnected,

    #[error("a connection attempt is already in progress")]
    AlreadyConnecting,

    #[error(transparent)]
    Signer(#[from] SignerError),
}

fn reports(network: &str, expected: Network) -> bool {
    network.parse::<Network>().map(|network| network == expected).unwrap_or(false)
}

/// Holds the session in `Connecting` and puts it back to `Disconnected` if
/// the attempt ends without activating it, including when the connecting
/// future is dropped
struct Connecting<'a>(&'a mut SessionState);

impl<'a> Connecting<'a> {
    fn start(state: &'a mut SessionState) -> Self {
        *state = SessionState::Connecting;
        Self(state)
    }

    fn activate(self, account: Address, network: Option<String>) {
        *self.0 = SessionState::Active { account, network };
    }
}

impl Drop for Connecting<'_> {
    fn drop(&mut self) {
        if *self.0 == SessionState::Connecting {
            *self.0 = SessionState::Disconnected;
        }
    }
}

/// An explicit wallet connection, passed to every call that needs an account.
///
/// The session expects the wallet to be on a given network. A wallet on
/// another network is still accepted, with a warning.
#[derive(Clone, Debug)]
pub struct Session {
    expected: Network,
    state: SessionState,
}

impl Session {
    pub fn new(expected: Network) -> Self {
        Self { expected, state: SessionState::Disconnected }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn expected_network(&self) -> Network {
        self.expected
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    /// The connected account
    pub fn active_account(&self) -> Result<Address, SessionError> {
        match &self.state {
            SessionState::Active { account, .. } => Ok(*account),
            _ => Err(SessionError::NotConnected),
        }
    }

    /// Whether the wallet reported the network this session expects
    pub fn network_matches(&self) -> bool {
        match &self.state {
            SessionState::Active { network: Some(network), .. } => self.is_expected(network),
            _ => false,
        }
    }

    fn is_expected(&self, network: &str) -> bool {
        reports(network, self.expected)
    }

    /// Asks the wallet for access and activates the session with the account
    /// the user picked
    pub async fn connect<S: ExternalSigner>(&mut self, signer: &S) -> Result<Address, SessionError> {
        match self.state {
            SessionState::Connecting => return Err(SessionError::AlreadyConnecting),
            SessionState::Active { account, .. } => return Ok(account),
            SessionState::Disconnected => {}
        }
        if !signer.is_available().await {
            return Err(SignerError::Unavailable("wallet is not installed".to_owned()).into())
        }

        let expected = self.expected;
        let connecting = Connecting::start(&mut self.state);
        let account = signer.request_access().await?;

        let network = match signer.network().await {
            Ok(network) => Some(network),
            Err(err) => {
                warn!(%err, "could not read the wallet's network");
                None
            }
        };
        if let Some(network) = &network {
            if !reports(network, expected) {
                warn!(wallet = %network, %expected, "wallet is on another network");
            }
        }

        info!(%account, "wallet connected");
        connecting.activate(account, network);
        Ok(account)
    }

    pub fn disconnect(&mut self) {
        debug!("wallet disconnected");
        self.state = SessionState::Disconnected;
    }

    /// Follows an account change reported by the wallet. `None` means the
    /// wallet got locked, which ends the session.
    pub fn apply_account_change(&mut self, change: Option<Address>) {
        if !self.is_active() {
            return
        }
        match change {
            Some(next) => {
                if let SessionState::Active { account, .. } = &mut self.state {
                    debug!(from = %account, to = %next, "wallet account changed");
                    *account = next;
                }
            }
            None => self.disconnect(),
        }
    }

    pub fn apply_network_change(&mut self, change: String) {
        if !self.is_expected(&change) {
            warn!(wallet = %change, expected = %self.expected, "wallet switched to another network");
        }
        if let SessionState::Active { network, .. } = &mut self.state {
            *network = Some(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockSigner;
    use std::time::Duration;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn connects_and_disconnects() {
        let alice = Address::account([1u8; 32]);
        let signer = MockSigner::new(alice);
        let mut session = Session::new(Network::Testnet);
        assert!(matches!(session.active_account(), Err(SessionError::NotConnected)));

        assert_eq!(session.connect(&signer).await.unwrap(), alice);
        assert_eq!(
            session.state(),
            &SessionState::Active { account: alice, network: Some("TESTNET".to_owned()) }
        );
        assert!(session.network_matches());

        session.disconnect();
        assert_eq!(session.state(), &SessionState::Disconnected);
    }

    #[tokio::test]
    async fn failed_access_returns_to_disconnected() {
        let signer = MockSigner::new(Address::account([1u8; 32]));
        signer.set_account(None);
        let mut session = Session::new(Network::Testnet);
        assert!(matches!(
            session.connect(&signer).await,
            Err(SessionError::Signer(SignerError::Unavailable(_)))
        ));
        assert_eq!(session.state(), &SessionState::Disconnected);

        let mut session = Session::new(Network::Testnet);
        assert!(session.connect(&MockSigner::not_installed()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_connect_returns_to_disconnected() {
        let alice = Address::account([1u8; 32]);
        let signer = MockSigner::new(alice);
        signer.hold_access(true);
        let mut session = Session::new(Network::Testnet);

        let attempt = tokio::time::timeout(Duration::from_secs(5), session.connect(&signer)).await;
        assert!(attempt.is_err());
        assert_eq!(session.state(), &SessionState::Disconnected);

        signer.hold_access(false);
        assert_eq!(session.connect(&signer).await.unwrap(), alice);
        assert!(session.is_active());
    }

    #[traced_test]
    #[tokio::test]
    async fn warns_on_network_mismatch() {
        let signer = MockSigner::new(Address::account([1u8; 32]));
        signer.set_network("PUBLIC");
        let mut session = Session::new(Network::Testnet);
        session.connect(&signer).await.unwrap();
        assert!(session.is_active());
        assert!(!session.network_matches());
        assert!(logs_contain("wallet is on another network"));
    }

    #[tokio::test]
    async fn follows_wallet_changes() {
        let (alice, bob) = (Address::account([1u8; 32]), Address::account([2u8; 32]));
        let mut session = Session::new(Network::Testnet);

        // changes are ignored while disconnected
        session.apply_account_change(Some(bob));
        assert!(!session.is_active());

        session.connect(&MockSigner::new(alice)).await.unwrap();
        session.apply_account_change(Some(bob));
        assert_eq!(session.active_account().unwrap(), bob);
        session.apply_network_change("PUBLIC".to_owned());
        assert!(!session.network_matches());
        session.apply_account_change(None);
        assert_eq!(session.state(), &SessionState::Disconnected);
    }
}
