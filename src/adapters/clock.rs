//! Host monotonic clock.
//!
//! The core takes `now_ms` as a parameter everywhere, so tests drive time
//! explicitly; this adapter supplies real monotonic milliseconds to the
//! owner loop in the binary.

use std::time::Instant;

/// Milliseconds since construction, monotonic.
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
