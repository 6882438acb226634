#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]
//! Provides a unified interface for having transactions signed by an external
//! wallet.
//!
//! The key material never leaves the wallet: the [`SignerGateway`] hands it the
//! canonical encoding of a transaction and gets a signed encoding back, which
//! it checks against the transaction it asked to be signed.
//!
//! You can implement the [`ExternalSigner`] trait to plug in a browser
//! extension bridge, a hardware device or a remote signing service.
//!
//! ```no_run
//! # use sente_core::types::{Account, Address, TESTNET_PASSPHRASE};
//! # use sente_core::types::transaction::{Operation, Payment, TransactionBuilder};
//! use sente_signers::{MockSigner, SignerGateway};
//!
//! # async fn foo() -> Result<(), Box<dyn std::error::Error>> {
//! let alice = Address::account([1u8; 32]);
//! let gateway = SignerGateway::new(MockSigner::new(alice));
//!
//! let tx = TransactionBuilder::new(Account::new(alice, 7), TESTNET_PASSPHRASE)
//!     .operation(Operation::Payment(Payment { destination: alice, amount: 1 }))
//!     .build()?;
//!
//! let signed = gateway.sign_transaction(&tx, None).await?;
//! assert_eq!(signed.hash(), tx.hash()?);
//! # Ok(())
//! # }
//! ```
mod error;
pub use error::{SignerError, REQUEST_PENDING_CODE, USER_REJECTED_CODE};

mod gateway;
pub use gateway::{cancellation, CancelHandle, CancelRegistration, SignerGateway};

mod mock;
pub use mock::{MockSigner, MockSignerResponse};

mod session;
pub use session::{Session, SessionError, SessionState};

mod watch;
pub use watch::{watch_account, watch_network, Subscription, DEFAULT_WATCH_INTERVAL};

use async_trait::async_trait;
use auto_impl::auto_impl;
use sente_core::types::Address;
use std::fmt::Debug;

/// Trait for wallets which hold keys on the user's behalf and sign on request.
///
/// Every method may suspend for as long as the wallet waits on its user.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait ExternalSigner: Debug + Send + Sync {
    /// Whether the wallet is installed and reachable
    async fn is_available(&self) -> bool;

    /// Asks the user to grant access and returns the account they picked
    async fn request_access(&self) -> Result<Address, SignerError>;

    /// The currently selected account. Fails with `Unavailable` while the
    /// wallet is locked.
    async fn public_key(&self) -> Result<Address, SignerError>;

    /// The name of the network the wallet is set to, e.g. `TESTNET`
    async fn network(&self) -> Result<String, SignerError>;

    /// Signs the base64 envelope for the network identified by
    /// `network_passphrase` and returns the signed envelope
    async fn sign_transaction(
        &self,
        envelope: &str,
        network_passphrase: &str,
    ) -> Result<String, SignerError>;
}
