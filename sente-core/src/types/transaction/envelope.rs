use super::Transaction;
use crate::{
    types::{
        xdr::{from_base64, to_base64, XdrError},
        AddressError, TxHash,
    },
    value::CodecError,
};
use stellar_xdr::curr::{self as xdr, TransactionV1Envelope};
use thiserror::Error;

pub use stellar_xdr::curr::DecoratedSignature;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error(transparent)]
    Xdr(#[from] XdrError),
    #[error(transparent)]
    Value(#[from] CodecError),
    #[error(transparent)]
    Address(#[from] AddressError),
    /// Valid XDR the pipeline does not produce, e.g. fee bumps or several operations
    #[error("unsupported envelope: {0}")]
    Unsupported(String),
}

impl From<xdr::Error> for EnvelopeError {
    fn from(err: xdr::Error) -> Self {
        EnvelopeError::Xdr(err.into())
    }
}

/// A transaction and the signatures collected for it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionEnvelope {
    pub tx: Transaction,
    pub signatures: Vec<DecoratedSignature>,
}

impl TransactionEnvelope {
    pub fn to_xdr(&self) -> Result<xdr::TransactionEnvelope, EnvelopeError> {
        Ok(xdr::TransactionEnvelope::Tx(TransactionV1Envelope {
            tx: self.tx.to_xdr()?,
            signatures: self.signatures.clone().try_into()?,
        }))
    }

    pub fn to_base64(&self) -> Result<String, EnvelopeError> {
        Ok(to_base64(&self.to_xdr()?)?)
    }

    /// Decodes an envelope. The passphrase is not part of the encoding and has
    /// to be supplied by the caller.
    pub fn from_base64(encoded: &str, network_passphrase: &str) -> Result<Self, EnvelopeError> {
        Self::from_xdr(&from_base64(encoded)?, network_passphrase)
    }

    pub fn from_xdr(
        envelope: &xdr::TransactionEnvelope,
        network_passphrase: &str,
    ) -> Result<Self, EnvelopeError> {
        match envelope {
            xdr::TransactionEnvelope::Tx(v1) => Ok(Self {
                tx: Transaction::from_xdr(&v1.tx, network_passphrase)?,
                signatures: v1.signatures.to_vec(),
            }),
            other => Err(EnvelopeError::Unsupported(format!("{} envelope", other.name()))),
        }
    }
}

/// A transaction as returned by the signer.
///
/// Keeps the exact encoding that was signed, which is what gets submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    encoded: String,
    envelope: TransactionEnvelope,
    hash: TxHash,
}

impl SignedTransaction {
    pub fn from_encoded(
        encoded: impl Into<String>,
        network_passphrase: &str,
    ) -> Result<Self, EnvelopeError> {
        let encoded = encoded.into();
        let raw: xdr::TransactionEnvelope = from_base64(&encoded)?;
        let envelope = TransactionEnvelope::from_xdr(&raw, network_passphrase)?;
        // hash the body as signed, not a re-encoding of it
        let hash = match raw {
            xdr::TransactionEnvelope::Tx(v1) => envelope.tx.hash_xdr(v1.tx)?,
            _ => envelope.tx.hash()?,
        };
        Ok(Self { encoded, envelope, hash })
    }

    /// The signed encoding, byte for byte as produced by the signer
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn transaction(&self) -> &Transaction {
        &self.envelope.tx
    }

    pub fn signatures(&self) -> &[DecoratedSignature] {
        &self.envelope.signatures
    }

    pub fn hash(&self) -> TxHash {
        self.hash
    }
}
