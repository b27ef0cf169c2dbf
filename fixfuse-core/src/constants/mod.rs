//! Constants for fixfuse Core
//!
//! Centralized, documented constants used throughout the engine. Every numeric
//! value that affects fusion or dead reckoning lives here with its unit in the
//! name and a note on where it comes from.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Fusion**: accuracy floors and cancellation thresholds
//! - **Extrapolation**: simulated speeds, accuracy and time units
//! - **Geodesy**: earth model
//! - **Buffers**: bounded collection sizes
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Include the unit in the name (`_M`, `_KMH`, `_MS`, `_DEG`)
//! 3. Document the source of every value

/// Fusion thresholds and accuracy floors.
pub mod fusion;

/// Dead-reckoning defaults and unit conversions.
pub mod extrapolation;

/// Earth model used by the geodesy helpers.
pub mod geodesy;

/// Bounded collection sizes.
pub mod buffers;

// Re-export commonly used constants for convenience
pub use fusion::{MIN_ACCURACY_RADIUS_M, UNKNOWN_ACCURACY_RADIUS_M};

pub use extrapolation::{
    DEFAULT_TICK_INTERVAL_MS, OFFROAD_SPEED_KMH, SIMULATED_ACCURACY_M,
};

pub use geodesy::EARTH_RADIUS_M;

pub use buffers::{DEFAULT_CHANNEL_CAPACITY, MAX_NOTIFICATIONS, MAX_RAW_LOCATIONS};
