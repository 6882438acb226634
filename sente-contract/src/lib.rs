#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
//! Type-safe invocation of Soroban contracts.
//!
//! A [`ContractCall`] carries one invocation through the whole pipeline:
//!
//! 1. a fresh snapshot of the source account is loaded and the unsigned
//!    transaction is built,
//! 2. the transaction is simulated and the simulated resources are merged in,
//! 3. the external signer signs it through the [`SignerGateway`](sente_signers::SignerGateway),
//! 4. it is submitted once and polled until it reaches a terminal status.
//!
//! Read-only calls stop after the simulation ([`ContractCall::call`]).
//!
//! [`SenteToken`] and [`SenteVault`] wrap the two deployed contracts with
//! typed methods, read fallbacks and [`TransactionOutcome`](sente_core::types::TransactionOutcome)
//! results for writes.
mod client;
pub use client::Client;

mod call;
pub use call::ContractCall;

mod contract;
pub use contract::Contract;

mod error;
pub use error::ContractError;

mod registry;
pub use registry::{ContractRegistry, RegistryError, SENTE_TOKEN, SENTE_VAULT};

mod token;
pub use token::SenteToken;

mod vault;
pub use vault::SenteVault;
