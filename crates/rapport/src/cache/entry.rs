//! Pending entry record and the caller-side handle.

use crate::domain::Envelope;
use crate::error::DeliveryError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// What a waiting caller receives.
pub(crate) type Delivery = Result<Envelope, DeliveryError>;

/// Everything the cache tracks for one in-flight request.
///
/// Channel, timer and stop signal live in one record so they are inserted
/// and removed together under the registry lock.
pub(crate) struct PendingEntry {
    /// Single-use channel to the caller (buffer of one, never blocks)
    sender: oneshot::Sender<Delivery>,
    /// Watcher task owning the timeout timer
    timer: JoinHandle<()>,
    /// Stops the watcher before its timer fires
    stop: oneshot::Sender<()>,
    registered_at: Instant,
    timeout: Duration,
}

impl PendingEntry {
    pub(crate) fn new(
        sender: oneshot::Sender<Delivery>,
        timer: JoinHandle<()>,
        stop: oneshot::Sender<()>,
        timeout: Duration,
    ) -> Self {
        Self {
            sender,
            timer,
            stop,
            registered_at: Instant::now(),
            timeout,
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.registered_at.elapsed()
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Stop the watcher and hand `delivery` to the caller.
    ///
    /// Returns `false` when the caller already dropped its handle.
    pub(crate) fn settle(self, delivery: Delivery) -> bool {
        // The watcher may already be past its timer; it will find no entry.
        let _ = self.stop.send(());
        self.timer.abort();
        self.sender.send(delivery).is_ok()
    }
}

/// Caller side of a pending request.
///
/// Resolves exactly once: to the response envelope (which may be the
/// synthesized 504 on timeout), or to a [`DeliveryError`] if the request was
/// cancelled or the cache went away.
#[derive(Debug)]
#[must_use = "a response handle does nothing unless awaited"]
pub struct ResponseHandle {
    id: String,
    receiver: oneshot::Receiver<Delivery>,
}

impl ResponseHandle {
    pub(crate) fn new(id: String, receiver: oneshot::Receiver<Delivery>) -> Self {
        Self { id, receiver }
    }

    /// Correlation ID this handle waits on
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Future for ResponseHandle {
    type Output = Result<Envelope, DeliveryError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(delivery)) => Poll::Ready(delivery),
            Poll::Ready(Err(_)) => Poll::Ready(Err(DeliveryError::Closed {
                id: this.id.clone(),
            })),
            Poll::Pending => Poll::Pending,
        }
    }
}
