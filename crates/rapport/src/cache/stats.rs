//! Counters for the correlation cache.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for the correlation cache
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Requests registered with a timeout
    pub total_registered: AtomicU64,
    /// Requests registered as fire-and-forget (never tracked)
    pub total_fire_and_forget: AtomicU64,
    /// Pending requests resolved by a real response
    pub total_resolved: AtomicU64,
    /// Pending requests resolved by their timeout
    pub total_timeouts: AtomicU64,
    /// Pending requests removed through `cancel` or `shutdown`
    pub total_cancelled: AtomicU64,
    /// Resolutions dropped because the caller no longer held its handle
    pub total_abandoned: AtomicU64,
    /// Responses for IDs that were not pending (late, duplicate or unknown)
    pub total_late_arrivals: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub registered: u64,
    pub fire_and_forget: u64,
    pub resolved: u64,
    pub timeouts: u64,
    pub cancelled: u64,
    pub abandoned: u64,
    pub late_arrivals: u64,
}

impl CacheStats {
    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            registered: self.total_registered.load(Ordering::Relaxed),
            fire_and_forget: self.total_fire_and_forget.load(Ordering::Relaxed),
            resolved: self.total_resolved.load(Ordering::Relaxed),
            timeouts: self.total_timeouts.load(Ordering::Relaxed),
            cancelled: self.total_cancelled.load(Ordering::Relaxed),
            abandoned: self.total_abandoned.load(Ordering::Relaxed),
            late_arrivals: self.total_late_arrivals.load(Ordering::Relaxed),
        }
    }
}
