//! Monotonic millisecond clock
//!
//! The measurement methodology is built for a coarse clock, so the default
//! clock deliberately throws away sub-millisecond precision.

use std::time::Instant;

/// Source of monotonic time in whole milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock truncated to milliseconds since creation
#[derive(Debug, Clone, Copy)]
pub struct MillisClock {
    origin: Instant,
}

impl MillisClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MillisClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MillisClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}
