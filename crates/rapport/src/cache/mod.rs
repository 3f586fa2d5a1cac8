//! Correlation cache: the pending-request registry.
//!
//! Tracks in-flight requests by correlation ID and guarantees that each
//! registered request is resolved exactly once, either by its response or by
//! a synthesized `504` when its timeout elapses.
//!
//! # Flow
//!
//! ```text
//! register(id, timeout)
//!   ├─ fire-and-forget → nothing tracked, no handle
//!   └─ otherwise       → PendingEntry { channel, timer task, stop signal }
//!                        stored under `id`, handle returned to the caller
//!
//! resolve(response) ──┐
//!                     ├─► remove entry under lock ─► first caller wins
//! timer fires ────────┘     (Response::timeout)      later callers no-op
//! ```
//!
//! The removal from the registry is the single serialization point: the
//! timer's watcher resolves through the same path as a real response, so
//! whichever reaches the lock first delivers and the other finds nothing.

mod entry;
mod stats;

pub use entry::ResponseHandle;
pub use stats::{CacheStats, CacheStatsSnapshot};

use crate::config::CacheConfig;
use crate::domain::Response;
use crate::error::{CacheError, DeliveryError};
use entry::PendingEntry;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Timeout applied when a request is registered with a zero timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTimeout {
    /// Fire-and-forget: nothing is tracked and no handle is returned
    NoResponse,
    /// The cache's default timeout
    Default,
    /// An explicit timeout; zero means `Default`
    After(Duration),
}

impl From<Duration> for RequestTimeout {
    fn from(timeout: Duration) -> Self {
        if timeout.is_zero() {
            RequestTimeout::Default
        } else {
            RequestTimeout::After(timeout)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cause {
    Response,
    Timeout,
}

/// Registry of pending requests.
///
/// Cheap to clone; clones share the same registry. When the last clone is
/// dropped, outstanding handles resolve to [`DeliveryError::Closed`].
#[derive(Clone)]
pub struct CorrelationCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    /// One lock over the whole entry record
    pending: Mutex<HashMap<String, PendingEntry>>,
    default_timeout: Duration,
    stats: CacheStats,
}

impl CorrelationCache {
    /// Create a cache with the 5 second default timeout.
    pub fn new() -> Self {
        Self::with_default_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a cache with a custom default timeout.
    ///
    /// A zero duration falls back to [`DEFAULT_TIMEOUT`].
    pub fn with_default_timeout(default_timeout: Duration) -> Self {
        let default_timeout = if default_timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            default_timeout
        };

        Self {
            inner: Arc::new(CacheInner {
                pending: Mutex::new(HashMap::new()),
                default_timeout,
                stats: CacheStats::default(),
            }),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_default_timeout(config.default_timeout)
    }

    /// Register a pending request and get a handle for its resolution.
    ///
    /// Returns `Ok(None)` for [`RequestTimeout::NoResponse`]. Otherwise spawns
    /// a watcher on the current tokio runtime that resolves the request with
    /// a `504` envelope once the timeout elapses.
    ///
    /// # Errors
    ///
    /// - [`CacheError::DuplicateId`] if `id` is already pending
    /// - [`CacheError::NoRuntime`] if called outside a tokio runtime
    pub fn register(
        &self,
        id: &str,
        timeout: impl Into<RequestTimeout>,
    ) -> Result<Option<ResponseHandle>, CacheError> {
        let timeout = match timeout.into() {
            RequestTimeout::NoResponse => {
                CacheStats::incr(&self.inner.stats.total_fire_and_forget);
                debug!(request_id = %id, "Fire-and-forget request, not tracked");
                return Ok(None);
            }
            RequestTimeout::After(timeout) if !timeout.is_zero() => timeout,
            RequestTimeout::After(_) | RequestTimeout::Default => self.inner.default_timeout,
        };

        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
        let deadline = Instant::now() + timeout;

        let mut pending = self.inner.pending.lock();
        if pending.contains_key(id) {
            warn!(request_id = %id, "Rejected registration of an already pending request");
            return Err(CacheError::DuplicateId { id: id.to_string() });
        }

        let (sender, receiver) = oneshot::channel();
        let (stop_tx, stop_rx) = oneshot::channel();
        let timer = runtime.spawn(watch(
            Arc::downgrade(&self.inner),
            id.to_string(),
            deadline,
            stop_rx,
        ));
        pending.insert(
            id.to_string(),
            PendingEntry::new(sender, timer, stop_tx, timeout),
        );
        drop(pending);

        CacheStats::incr(&self.inner.stats.total_registered);
        debug!(
            request_id = %id,
            timeout_ms = timeout.as_millis() as u64,
            "Registered pending request"
        );

        Ok(Some(ResponseHandle::new(id.to_string(), receiver)))
    }

    /// Resolve the pending request matching `response.id`.
    ///
    /// Delivers the error envelope for error responses and the body envelope
    /// otherwise. Returns `false` (and does nothing else) when no request with
    /// that ID is pending. Never blocks: a caller that dropped its handle
    /// simply misses the delivery.
    pub fn resolve(&self, response: Response) -> bool {
        self.inner.complete(response, Cause::Response)
    }

    /// Abandon a pending request.
    ///
    /// The waiter, if still listening, receives [`DeliveryError::Cancelled`];
    /// any later response for `id` is a no-op.
    pub fn cancel(&self, id: &str) -> bool {
        let Some(entry) = self.inner.pending.lock().remove(id) else {
            return false;
        };

        entry.settle(Err(DeliveryError::Cancelled { id: id.to_string() }));
        CacheStats::incr(&self.inner.stats.total_cancelled);
        debug!(request_id = %id, "Cancelled pending request");
        true
    }

    /// Close every pending request with [`DeliveryError::Closed`].
    ///
    /// Returns the number of requests closed. The cache stays usable.
    pub fn shutdown(&self) -> usize {
        let drained: Vec<_> = self.inner.pending.lock().drain().collect();
        let count = drained.len();

        for (id, entry) in drained {
            entry.settle(Err(DeliveryError::Closed { id }));
            CacheStats::incr(&self.inner.stats.total_cancelled);
        }

        if count > 0 {
            debug!(count, "Closed all pending requests");
        }
        count
    }

    /// Number of requests currently pending
    pub fn pending_count(&self) -> usize {
        self.inner.pending.lock().len()
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.inner.pending.lock().contains_key(id)
    }

    pub fn default_timeout(&self) -> Duration {
        self.inner.default_timeout
    }

    pub fn stats(&self) -> &CacheStats {
        &self.inner.stats
    }
}

impl Default for CorrelationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CorrelationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrelationCache")
            .field("pending", &self.pending_count())
            .field("default_timeout", &self.inner.default_timeout)
            .finish()
    }
}

impl CacheInner {
    fn complete(&self, response: Response, cause: Cause) -> bool {
        let entry = self.pending.lock().remove(&response.id);

        let Some(entry) = entry else {
            if cause == Cause::Response {
                CacheStats::incr(&self.stats.total_late_arrivals);
                debug!(
                    request_id = %response.id,
                    "Response for unknown or already resolved request"
                );
            }
            return false;
        };

        let id = response.id.clone();
        let elapsed_ms = entry.elapsed().as_millis() as u64;
        let timeout_ms = entry.timeout().as_millis() as u64;
        let delivered = entry.settle(Ok(response.into_envelope()));

        match cause {
            Cause::Response => {
                CacheStats::incr(&self.stats.total_resolved);
                debug!(request_id = %id, elapsed_ms, "Resolved pending request");
            }
            Cause::Timeout => {
                CacheStats::incr(&self.stats.total_timeouts);
                debug!(request_id = %id, timeout_ms, "Pending request timed out");
            }
        }

        if !delivered {
            CacheStats::incr(&self.stats.total_abandoned);
            warn!(request_id = %id, "Resolution dropped, caller no longer waiting");
        }

        true
    }
}

/// Watcher task: waits for the stop signal or the deadline.
///
/// The stop channel also closes when the entry is dropped without being
/// settled, which ends the watcher the same way.
async fn watch(
    cache: Weak<CacheInner>,
    id: String,
    deadline: Instant,
    stop: oneshot::Receiver<()>,
) {
    tokio::select! {
        biased;
        _ = stop => {}
        _ = tokio::time::sleep_until(deadline) => {
            if let Some(cache) = cache.upgrade() {
                cache.complete(Response::timeout(id), Cause::Timeout);
            }
        }
    }
}
