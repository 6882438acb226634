pub mod builder;
pub use builder::{BuilderError, TransactionBuilder};

pub mod assemble;
pub use assemble::{assemble, AssembleError};

mod envelope;
pub use envelope::{DecoratedSignature, EnvelopeError, SignedTransaction, TransactionEnvelope};

use super::{Address, TxHash};
use crate::value::ContractValue;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use stellar_xdr::curr::{
    self as xdr, Asset, HostFunction, InvokeContractArgs, InvokeHostFunctionOp, Limits,
    OperationBody, PaymentOp, Preconditions, ScVal, SequenceNumber, SorobanAuthorizationEntry,
    TimePoint, TransactionExt, TransactionSignaturePayload,
    TransactionSignaturePayloadTaggedTransaction, WriteXdr,
};

/// Resource declaration produced by simulation and attached during assembly
pub type SorobanData = xdr::SorobanTransactionData;

/// Fee in stroops for classic operations such as payments
pub const BASE_FEE: u32 = 100;

/// Inclusion fee in stroops used for contract invocations. The resource fee
/// reported by simulation is added on top of it during assembly.
pub const CONTRACT_FEE: u32 = 100_000;

/// Default validity window of a transaction, in seconds
pub const DEFAULT_TX_TIMEOUT: i64 = 180;

/// Maximum length of a text memo, in bytes
pub const MAX_MEMO_TEXT_LEN: usize = 28;

/// Optional note attached to a transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Memo {
    Text(String),
    Id(u64),
}

impl Memo {
    /// Creates a text memo, checking its length
    pub fn text(text: impl Into<String>) -> Result<Self, BuilderError> {
        let text = text.into();
        if text.len() > MAX_MEMO_TEXT_LEN {
            return Err(BuilderError::MemoTooLong(text.len()))
        }
        Ok(Memo::Text(text))
    }

    fn to_xdr(memo: Option<&Memo>) -> Result<xdr::Memo, EnvelopeError> {
        Ok(match memo {
            None => xdr::Memo::None,
            Some(Memo::Text(text)) => xdr::Memo::Text(text.as_bytes().to_vec().try_into()?),
            Some(Memo::Id(id)) => xdr::Memo::Id(*id),
        })
    }

    fn from_xdr(memo: &xdr::Memo) -> Result<Option<Memo>, EnvelopeError> {
        Ok(match memo {
            xdr::Memo::None => None,
            xdr::Memo::Text(text) => Some(Memo::Text(text.to_utf8_string()?)),
            xdr::Memo::Id(id) => Some(Memo::Id(*id)),
            other => return Err(EnvelopeError::Unsupported(format!("{} memo", other.name()))),
        })
    }
}

/// Calls `function` on `contract` with the given arguments
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvokeContract {
    pub contract: Address,
    pub function: String,
    pub args: Vec<ContractValue>,
    /// Authorization entries; filled from simulation when left empty
    pub auth: Vec<SorobanAuthorizationEntry>,
}

impl InvokeContract {
    pub fn new(contract: Address, function: impl Into<String>, args: Vec<ContractValue>) -> Self {
        Self { contract, function: function.into(), args, auth: Vec::new() }
    }
}

/// Sends `amount` stroops of the native asset to `destination`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payment {
    pub destination: Address,
    pub amount: i64,
}

/// The single instruction a transaction carries
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    InvokeContract(InvokeContract),
    Payment(Payment),
}

impl Operation {
    pub fn as_invocation(&self) -> Option<&InvokeContract> {
        match self {
            Operation::InvokeContract(call) => Some(call),
            Operation::Payment(_) => None,
        }
    }

    fn to_xdr(&self) -> Result<xdr::Operation, EnvelopeError> {
        let body = match self {
            Operation::InvokeContract(call) => {
                let args = call
                    .args
                    .iter()
                    .map(ScVal::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                OperationBody::InvokeHostFunction(InvokeHostFunctionOp {
                    host_function: HostFunction::InvokeContract(InvokeContractArgs {
                        contract_address: call.contract.to_sc_address(),
                        function_name: xdr::ScSymbol(call.function.as_bytes().to_vec().try_into()?),
                        args: args.try_into()?,
                    }),
                    auth: call.auth.clone().try_into()?,
                })
            }
            Operation::Payment(payment) => OperationBody::Payment(PaymentOp {
                destination: payment.destination.to_muxed_account()?,
                asset: Asset::Native,
                amount: payment.amount,
            }),
        };
        Ok(xdr::Operation { source_account: None, body })
    }

    fn from_xdr(op: &xdr::Operation) -> Result<Self, EnvelopeError> {
        if op.source_account.is_some() {
            return Err(EnvelopeError::Unsupported("operation source account".to_owned()))
        }
        match &op.body {
            OperationBody::InvokeHostFunction(InvokeHostFunctionOp {
                host_function: HostFunction::InvokeContract(call),
                auth,
            }) => Ok(Operation::InvokeContract(InvokeContract {
                contract: Address::from(&call.contract_address),
                function: call.function_name.0.to_utf8_string()?,
                args: call
                    .args
                    .iter()
                    .cloned()
                    .map(ContractValue::try_from)
                    .collect::<Result<_, _>>()?,
                auth: auth.to_vec(),
            })),
            OperationBody::Payment(PaymentOp { destination, asset: Asset::Native, amount }) => {
                Ok(Operation::Payment(Payment { destination: destination.into(), amount: *amount }))
            }
            other => Err(EnvelopeError::Unsupported(format!("{} operation", other.name()))),
        }
    }
}

/// Unix timestamps (seconds) bounding when a transaction may be included
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

/// An unsigned transaction.
///
/// Built once by the [`TransactionBuilder`] and only modified afterwards by
/// [`assemble`], which attaches the simulated resource declaration. Its wire
/// form is the XDR `Transaction` returned by [`Transaction::to_xdr`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub source: Address,
    pub sequence: i64,
    /// Total fee in stroops (inclusion fee plus resource fee once assembled)
    pub fee: u32,
    pub memo: Option<Memo>,
    pub operation: Operation,
    pub time_bounds: TimeBounds,
    pub soroban_data: Option<SorobanData>,
    /// Not part of the encoding; it is supplied again when decoding an envelope
    pub network_passphrase: String,
}

impl Transaction {
    pub fn to_xdr(&self) -> Result<xdr::Transaction, EnvelopeError> {
        Ok(xdr::Transaction {
            source_account: self.source.to_muxed_account()?,
            fee: self.fee,
            seq_num: SequenceNumber(self.sequence),
            cond: Preconditions::Time(xdr::TimeBounds {
                min_time: TimePoint(self.time_bounds.min_time),
                max_time: TimePoint(self.time_bounds.max_time),
            }),
            memo: Memo::to_xdr(self.memo.as_ref())?,
            operations: vec![self.operation.to_xdr()?].try_into()?,
            ext: match &self.soroban_data {
                Some(data) => TransactionExt::V1(data.clone()),
                None => TransactionExt::V0,
            },
        })
    }

    /// Reads back an XDR transaction carrying a single supported operation
    pub fn from_xdr(tx: &xdr::Transaction, network_passphrase: &str) -> Result<Self, EnvelopeError> {
        let operation = match tx.operations.as_slice() {
            [op] => Operation::from_xdr(op)?,
            ops => {
                return Err(EnvelopeError::Unsupported(format!("{} operations", ops.len())))
            }
        };
        let time_bounds = match &tx.cond {
            Preconditions::None => TimeBounds::default(),
            Preconditions::Time(bounds) => {
                TimeBounds { min_time: bounds.min_time.0, max_time: bounds.max_time.0 }
            }
            Preconditions::V2(_) => {
                return Err(EnvelopeError::Unsupported("v2 preconditions".to_owned()))
            }
        };
        Ok(Self {
            source: Address::from(&tx.source_account),
            sequence: tx.seq_num.0,
            fee: tx.fee,
            memo: Memo::from_xdr(&tx.memo)?,
            operation,
            time_bounds,
            soroban_data: match &tx.ext {
                TransactionExt::V0 => None,
                TransactionExt::V1(data) => Some(data.clone()),
            },
            network_passphrase: network_passphrase.to_owned(),
        })
    }

    /// Hash of the transaction on its network: sha256 of the XDR signature
    /// payload, which binds the body to `sha256(passphrase)`.
    pub fn hash(&self) -> Result<TxHash, EnvelopeError> {
        Ok(self.hash_xdr(self.to_xdr()?)?)
    }

    pub(crate) fn hash_xdr(&self, tx: xdr::Transaction) -> Result<TxHash, xdr::Error> {
        let network_id = Sha256::digest(self.network_passphrase.as_bytes());
        let payload = TransactionSignaturePayload {
            network_id: xdr::Hash(network_id.into()),
            tagged_transaction: TransactionSignaturePayloadTaggedTransaction::Tx(tx),
        };
        Ok(TxHash(Sha256::digest(payload.to_xdr(Limits::none())?).into()))
    }

    /// The base64 envelope with no signatures attached, as handed to a signer
    pub fn to_envelope(&self) -> Result<String, EnvelopeError> {
        TransactionEnvelope { tx: self.clone(), signatures: Vec::new() }.to_base64()
    }

    /// Whether simulation data has been attached
    pub fn is_assembled(&self) -> bool {
        self.soroban_data.is_some()
    }

    /// The fee declared for inclusion, without any attached resource fee
    pub fn inclusion_fee(&self) -> u32 {
        let resource_fee = self.soroban_data.as_ref().map(|data| data.resource_fee).unwrap_or(0);
        (self.fee as i64).saturating_sub(resource_fee).clamp(0, u32::MAX as i64) as u32
    }
}
