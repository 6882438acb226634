#![cfg_attr(docsrs, feature(doc_cfg))]
//! Soroban data types, contract value codec and transaction utilities.
//! _It is recommended to use the `types`, `value` and `utils` re-exports of the
//! `sente` crate instead of depending on this crate directly._
//!
//! This library provides the data model shared by the rest of the workspace:
//! strkey addresses, account snapshots, transactions and their envelopes,
//! simulation results and the outcome of an invocation.
//!
//! ## Building a contract invocation
//!
//! ```rust
//! use sente_core::types::{
//!     transaction::{TransactionBuilder, CONTRACT_FEE},
//!     Account, Address, InvokeContract, Network, Operation,
//! };
//! use sente_core::value::IntoContractValue;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Address::account([1u8; 32]);
//! let token = Address::contract([2u8; 32]);
//! let account = Account::new(source, 41);
//!
//! let tx = TransactionBuilder::new(account, Network::Testnet.passphrase())
//!     .fee(CONTRACT_FEE)
//!     .operation(Operation::InvokeContract(InvokeContract::new(
//!         token,
//!         "balance",
//!         vec![source.into_contract_value()],
//!     )))
//!     .build()?;
//!
//! assert_eq!(tx.sequence, 42);
//! // the unsigned base64 XDR envelope handed to a signer
//! let envelope = tx.to_envelope()?;
//! assert!(!envelope.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Contract values
//!
//! Values crossing the contract boundary are expressed as [`value::ContractValue`],
//! a closed union of the wire types the pipeline supports. On the wire they
//! travel as XDR `ScVal`s. The [`value::encode`] and [`value::decode`]
//! functions convert between those and [`value::Native`] values.
pub mod types;

pub mod value;

/// The XDR definitions the wire types are built on
pub use stellar_xdr;

/// Network configuration resolved from defaults or the environment
pub mod config;

/// Various utilities
pub mod utils;
