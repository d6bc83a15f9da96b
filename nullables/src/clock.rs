//! Nullable clock: deterministic time for testing.

use pledge_types::Timestamp;
use std::cell::Cell;

const DAY: u64 = 24 * 3600;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to. Engine calls take `now` as an
/// argument; tests read it from here.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get() + secs);
    }

    pub fn advance_days(&self, days: u64) {
        self.advance(days * DAY);
    }

    /// Set the time to a specific value.
    pub fn set(&self, at: Timestamp) {
        self.current.set(at.as_secs());
    }
}
