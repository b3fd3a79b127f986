//! Shared utilities for votechain.

pub mod logging;

pub use logging::{init_logging, LogFormat};
