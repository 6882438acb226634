#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]
#![deny(rustdoc::broken_intra_doc_links)]
#![doc(test(no_crate_inject, attr(deny(rust_2018_idioms), allow(dead_code, unused_variables))))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # sente-rs
//!
//! Call Soroban smart contracts on Stellar and reliably learn the outcome.
//!
//! A state-mutating call goes through five steps: the transaction is built
//! from a fresh account snapshot, simulated to learn its resources and fee,
//! signed by an external wallet, submitted, and polled until it reaches a
//! terminal status. Every write resolves to a [`TransactionOutcome`](types::TransactionOutcome).
//! Read-only calls are answered from the simulation alone.
//!
//! # Quickstart
//!
//! ```no_run
//! use sente::prelude::*;
//!
//! # async fn foo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NetworkConfig::from_env()?;
//! let provider = Provider::from_config(&config);
//! provider.verify_network().await?;
//!
//! let registry = ContractRegistry::load("deployment.json")?;
//! # let signer = MockSigner::new(Address::account([1u8; 32]));
//! let client = Client::new(provider, signer);
//!
//! let mut session = Session::new(config.network);
//! let account = client.connect_session(&mut session).await?;
//!
//! let token = SenteToken::from_registry(&registry, client.clone())?;
//! let balance = token.balance(&session, account).await;
//! println!("balance: {}", format_amount(balance, token.decimals(&session).await)?);
//!
//! match token.claim_faucet(&session).await {
//!     TransactionOutcome::Success(()) => println!("claimed"),
//!     TransactionOutcome::Failed(failure) => println!("claim failed: {failure}"),
//!     TransactionOutcome::TimedOut(hash) => println!("still pending: {hash}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Crates
//!
//! - [`core`]: addresses, transactions, the contract value codec and units
//! - [`providers`]: the execution and ledger endpoint clients and the finality poller
//! - [`signers`]: the external signer interface, the signing gateway and wallet sessions
//! - [`contract`]: the invocation pipeline and the token and vault bindings

#[doc(inline)]
pub use sente_contract as contract;
#[doc(inline)]
pub use sente_core as core;
#[doc(inline)]
pub use sente_providers as providers;
#[doc(inline)]
pub use sente_signers as signers;

// Convenience re-exports
pub use sente_core::{config, types, utils, value};

/// Easy imports of frequently used type definitions and traits
#[doc(hidden)]
pub mod prelude {
    pub use super::contract::*;

    pub use super::core::{
        config::NetworkConfig,
        types::*,
        utils::{format_address, format_amount, parse_amount},
        value::{ContractValue, FromContractValue, IntoContractValue},
    };

    pub use super::providers::*;

    pub use super::signers::*;
}
