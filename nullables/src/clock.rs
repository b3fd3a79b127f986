//! Nullable clock: deterministic block timestamps for testing.

use chrono::{DateTime, TimeDelta, Utc};
use std::cell::Cell;
use votechain_types::{Clock, Timestamp};

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to, or by `step_secs` after each
/// reading when built with [`NullClock::ticking`].
pub struct NullClock {
    current: Cell<i64>,
    step_secs: i64,
}

impl NullClock {
    /// A frozen clock at `initial_secs` (Unix seconds, rendered as UTC).
    pub fn new(initial_secs: i64) -> Self {
        Self {
            current: Cell::new(initial_secs),
            step_secs: 0,
        }
    }

    /// A clock that advances by `step_secs` after every reading.
    pub fn ticking(initial_secs: i64, step_secs: i64) -> Self {
        Self {
            current: Cell::new(initial_secs),
            step_secs,
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: i64) {
        self.current.set(self.current.get() + secs);
    }

    /// Advance time by a calendar duration.
    pub fn advance_by(&self, delta: TimeDelta) {
        self.advance(delta.num_seconds());
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: i64) {
        self.current.set(secs);
    }

    fn render(secs: i64) -> Timestamp {
        let datetime = DateTime::<Utc>::from_timestamp(secs, 0)
            .unwrap_or_default()
            .naive_utc();
        Timestamp::from_datetime(&datetime)
    }
}

impl Default for NullClock {
    /// Frozen at 2025-01-01 00:00:00 UTC.
    fn default() -> Self {
        Self::new(1_735_689_600)
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        let secs = self.current.get();
        self.current.set(secs + self.step_secs);
        Self::render(secs)
    }
}
