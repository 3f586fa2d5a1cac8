//! Request ID generation.
//!
//! IDs are decimal strings from a bounded counter that wraps back to 1 after
//! reaching its ceiling. They are only unique while fewer than `ceiling`
//! requests are pending at once, which holds for any sane timeout because
//! pending entries are short-lived. This is not a globally unique scheme.

use parking_lot::Mutex;

/// Default counter ceiling.
pub const DEFAULT_ID_CEILING: u64 = 10_000;

/// Bounded, wrapping request ID counter.
///
/// Owned by a session (or whoever builds requests) rather than living in a
/// global, so independent connections never share a sequence.
#[derive(Debug)]
pub struct RequestIdGenerator {
    counter: Mutex<u64>,
    ceiling: u64,
}

impl RequestIdGenerator {
    /// Create a generator with the default ceiling.
    pub fn new() -> Self {
        Self::with_ceiling(DEFAULT_ID_CEILING)
    }

    /// Create a generator that wraps after `ceiling` IDs.
    ///
    /// A zero ceiling is treated as 1.
    pub fn with_ceiling(ceiling: u64) -> Self {
        Self {
            counter: Mutex::new(0),
            ceiling: ceiling.max(1),
        }
    }

    /// Produce the next ID.
    pub fn next_id(&self) -> String {
        let mut counter = self.counter.lock();

        if *counter >= self.ceiling {
            *counter = 0;
        }

        *counter += 1;
        counter.to_string()
    }

    /// The configured ceiling
    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }
}

impl Default for RequestIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
