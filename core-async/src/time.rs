//! Time-related re-exports.

pub use std::time::{Duration, Instant};
pub use tokio::time::{sleep, timeout};
