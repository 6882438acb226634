//! Change notifications for wallets that can only be polled
use crate::{ExternalSigner, SignerError};
use futures_util::{
    future::{AbortHandle, Abortable},
    stream::{self, BoxStream, Stream, StreamExt},
};
use sente_core::types::Address;
use std::{
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};
use tokio::time::sleep;
use tracing::trace;

/// How often the wallet is asked for its state
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_millis(2000);

/// A stream of changes, ended by [`Subscription::unsubscribe`] or by dropping it
#[must_use = "subscriptions do nothing unless polled"]
pub struct Subscription<T> {
    inner: Abortable<BoxStream<'static, T>>,
    handle: AbortHandle,
}

impl<T> Subscription<T> {
    fn new(stream: BoxStream<'static, T>) -> Self {
        let (handle, registration) = AbortHandle::new_pair();
        Self { inner: Abortable::new(stream, registration), handle }
    }

    /// Stops polling. The stream ends at its next poll.
    pub fn unsubscribe(&self) {
        self.handle.abort()
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("handle", &self.handle).finish()
    }
}

/// Yields the selected account whenever it changes, `None` when the wallet
/// gets locked. Fails with `Unavailable` when no wallet is installed.
pub async fn watch_account<S>(
    signer: S,
    interval: Duration,
) -> Result<Subscription<Option<Address>>, SignerError>
where
    S: ExternalSigner + 'static,
{
    if !signer.is_available().await {
        return Err(SignerError::Unavailable("wallet is not installed".to_owned()))
    }
    let current = signer.public_key().await.ok();

    let changes = stream::unfold((signer, current), move |(signer, last)| async move {
        loop {
            sleep(interval).await;
            let account = signer.public_key().await.ok();
            if account != last {
                trace!(?account, "wallet account changed");
                return Some((account, (signer, account)))
            }
        }
    });
    Ok(Subscription::new(changes.boxed()))
}

/// Yields the wallet's network name whenever it changes. Failed reads are
/// skipped.
pub async fn watch_network<S>(
    signer: S,
    interval: Duration,
) -> Result<Subscription<String>, SignerError>
where
    S: ExternalSigner + 'static,
{
    if !signer.is_available().await {
        return Err(SignerError::Unavailable("wallet is not installed".to_owned()))
    }
    let current = signer.network().await.ok();

    let changes = stream::unfold((signer, current), move |(signer, mut last)| async move {
        loop {
            sleep(interval).await;
            match signer.network().await {
                Ok(network) if last.as_ref() != Some(&network) => {
                    trace!(%network, "wallet network changed");
                    last = Some(network.clone());
                    return Some((network, (signer, last)))
                }
                Ok(_) => {}
                Err(err) => trace!(%err, "could not read the wallet's network"),
            }
        }
    });
    Ok(Subscription::new(changes.boxed()))
}
