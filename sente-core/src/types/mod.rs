mod address;
pub use address::{Address, AddressError, STRKEY_LEN};

mod hash;
pub use hash::{TxHash, TxHashError};

mod account;
pub use account::{Account, Balance};

mod network;
pub use network::{Network, ParseNetworkError, MAINNET_PASSPHRASE, TESTNET_PASSPHRASE};

pub mod transaction;
pub use transaction::{
    DecoratedSignature, EnvelopeError, InvokeContract, Memo, Operation, Payment,
    SignedTransaction, SorobanData, TimeBounds, Transaction, TransactionEnvelope,
};

mod simulation;
pub use simulation::*;

mod rpc;
pub use rpc::*;

mod outcome;
pub use outcome::{Failure, FailureKind, TransactionOutcome};

mod deployment;
pub use deployment::{DeploymentError, DeploymentRecord};

pub mod serde_helpers;

pub mod xdr;
