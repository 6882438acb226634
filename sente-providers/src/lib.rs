#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]
#![allow(clippy::type_complexity)]
//! # Clients for the Soroban execution endpoint and the Horizon ledger endpoint
//!
//! A [`Provider`] combines two collaborators:
//!
//! - a [`JsonRpcClient`] talking to the execution endpoint (simulation,
//!   asynchronous submission, status polling), and
//! - a [`LedgerClient`] talking to the ledger endpoint (account snapshots,
//!   synchronous submission, test network funding).
//!
//! # Examples
//!
//! ```no_run
//! use sente_core::{config::NetworkConfig, types::{Address, Network}};
//! use sente_providers::Provider;
//!
//! # async fn foo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NetworkConfig::new(Network::Testnet)?;
//! let provider = Provider::from_config(&config);
//!
//! let latest = provider.get_latest_ledger().await?;
//! println!("latest ledger: {}", latest.sequence);
//!
//! let account: Address = "GAAZI4TCR3TY5OJHCTJC2A4QSY6CJWJH5IAJTGKIN2ER7LBNVKOCCWN7".parse()?;
//! println!("balance: {}", provider.native_balance(&account).await?);
//! # Ok(())
//! # }
//! ```
//!
//! # Testing
//!
//! [`Provider::mocked`] returns a provider backed by a [`MockProvider`] and a
//! [`MockLedger`], together with handles to both so tests can queue responses
//! and inspect what was sent.
mod transports;
pub use transports::*;

mod ledger;
pub use ledger::*;

mod errors;
pub use errors::{ProviderError, RpcError, SubmissionError};

mod provider;
pub use provider::Provider;

mod pending_transaction;
pub use pending_transaction::{PendingTransaction, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL};

use async_trait::async_trait;
use auto_impl::auto_impl;
use serde::{de::DeserializeOwned, Serialize};
use std::{error::Error, fmt::Debug, future::Future, pin::Pin};

// Helper type alias
pub(crate) type PinBoxFut<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

#[async_trait]
#[auto_impl(&, Box, Arc)]
/// Trait which must be implemented by data transports to be used with the
/// Soroban JSON-RPC provider.
pub trait JsonRpcClient: Debug + Send + Sync {
    /// A JSON-RPC Error
    type Error: Error + Into<ProviderError>;

    /// Sends a request with the provided JSON-RPC and parameters serialized as JSON
    async fn request<T, R>(&self, method: &str, params: T) -> Result<R, Self::Error>
    where
        T: Debug + Serialize + Send + Sync,
        R: DeserializeOwned + Send;
}
