use crate::{ExternalSigner, SignerError};
use futures_util::future::{AbortHandle, AbortRegistration, Abortable};
use sente_core::types::{SignedTransaction, Transaction};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, instrument};

/// Cancels the signing request it was paired with
#[derive(Clone, Debug)]
pub struct CancelHandle(AbortHandle);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.abort()
    }
}

/// Passed along with a signing request so it can be cancelled from elsewhere
#[derive(Debug)]
pub struct CancelRegistration(AbortRegistration);

/// Creates a linked cancellation pair
pub fn cancellation() -> (CancelHandle, CancelRegistration) {
    let (handle, registration) = AbortHandle::new_pair();
    (CancelHandle(handle), CancelRegistration(registration))
}

/// Forwards signing requests to an external signer, one at a time.
///
/// A second request while one is waiting on the user fails immediately with
/// [`SignerError::Busy`] instead of being queued in the wallet.
#[derive(Debug)]
pub struct SignerGateway<S> {
    signer: S,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the request finishes or is dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<S: ExternalSigner> SignerGateway<S> {
    pub fn new(signer: S) -> Self {
        Self { signer, in_flight: AtomicBool::new(false) }
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Whether a request is currently waiting on the signer
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> Result<InFlight<'_>, SignerError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| InFlight(&self.in_flight))
            .map_err(|_| SignerError::Busy)
    }

    /// Hands `envelope` to the signer and returns the signed envelope
    /// unchanged. The wait may be interrupted through `cancel`.
    pub async fn sign(
        &self,
        envelope: &str,
        network_passphrase: &str,
        cancel: Option<CancelRegistration>,
    ) -> Result<String, SignerError> {
        let _guard = self.acquire()?;
        let request = self.signer.sign_transaction(envelope, network_passphrase);
        match cancel {
            Some(CancelRegistration(registration)) => {
                Abortable::new(request, registration).await.map_err(|_| SignerError::Cancelled)?
            }
            None => request.await,
        }
    }

    /// Signs `tx` and checks that the signer returned the same transaction
    /// with at least one signature attached
    #[instrument(skip_all, fields(source = %tx.source, sequence = tx.sequence))]
    pub async fn sign_transaction(
        &self,
        tx: &Transaction,
        cancel: Option<CancelRegistration>,
    ) -> Result<SignedTransaction, SignerError> {
        debug!("requesting signature");
        let envelope = tx.to_envelope()?;
        let encoded = self.sign(&envelope, &tx.network_passphrase, cancel).await?;
        let signed = SignedTransaction::from_encoded(encoded, &tx.network_passphrase)?;

        if signed.transaction() != tx {
            return Err(SignerError::Mismatch)
        }
        if signed.signatures().is_empty() {
            return Err(SignerError::MissingSignature)
        }
        debug!(hash = %signed.hash(), signatures = signed.signatures().len(), "transaction signed");
        Ok(signed)
    }
}
