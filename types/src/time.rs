//! Timestamp type and the clock seam used when stamping blocks.
//!
//! Timestamps are second-precision wall-clock strings in local time
//! (`YYYY-MM-DD HH:MM:SS`). They are part of the hashed header, so they are
//! stored exactly as written and never re-parsed or normalised.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `strftime` pattern for block timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A block timestamp as recorded in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Format a calendar time with [`TIMESTAMP_FORMAT`].
    pub fn from_datetime(datetime: &NaiveDateTime) -> Self {
        Self(datetime.format(TIMESTAMP_FORMAT).to_string())
    }

    /// The current local time, truncated to seconds.
    pub fn now() -> Self {
        Self(Local::now().format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of block timestamps.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock backed by the system's local time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
