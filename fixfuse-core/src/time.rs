//! Time management for location fixes
//!
//! All location sources must stamp their fixes against the same reference
//! (usually system time) so fixes can be compared and extrapolated. Provides:
//! - System clock (when available)
//! - Fixed clock (for tests and replay)
//! - Elapsed-time helpers used by dead reckoning

use crate::constants::extrapolation::MS_PER_DECISECOND;

/// Timestamp in milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Sentinel fix time meaning "never had a fix"
pub const NO_FIX: Timestamp = 0;

/// Source of time for the system
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Create a clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute time
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms` milliseconds
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Milliseconds from `earlier` to `later`, zero if the clock went backwards
pub fn delta_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}

/// Elapsed time in (fractional) deciseconds
pub fn elapsed_deciseconds(earlier: Timestamp, later: Timestamp) -> f64 {
    delta_ms(earlier, later) as f64 / MS_PER_DECISECOND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);

        time.set(42);
        assert_eq!(time.now(), 42);
    }

    #[test]
    fn elapsed_never_negative() {
        assert_eq!(delta_ms(2000, 1000), 0);
        assert_eq!(elapsed_deciseconds(1000, 2500), 15.0);
        assert_eq!(elapsed_deciseconds(2500, 1000), 0.0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_clock_is_after_epoch() {
        let clock = SystemClock;
        assert!(clock.now() > NO_FIX);
        assert!(clock.is_wall_clock());
    }
}
