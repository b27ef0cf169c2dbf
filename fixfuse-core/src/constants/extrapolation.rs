//! Dead-Reckoning Constants
//!
//! Defaults for simulated travel along a route when no fresh fix is available.

// ===== SIMULATED MOTION =====

/// Speed used when neither the road profile nor the route supplies one, in km/h.
///
/// Walking pace. Guarantees forward progress on unknown or off-road segments
/// without producing implausible jumps.
pub const OFFROAD_SPEED_KMH: f64 = 5.0;

/// Accuracy radius stamped on simulated locations, in meters.
///
/// About one lane width.
pub const SIMULATED_ACCURACY_M: f64 = 3.0;

/// Default period of the vehicle update timer, in milliseconds.
///
/// Matches the 1 Hz refresh rate of most GNSS receivers.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

// ===== UNIT CONVERSIONS =====

/// Milliseconds per decisecond.
pub const MS_PER_DECISECOND: f64 = 100.0;

/// Deciseconds per second.
pub const DECISECONDS_PER_SECOND: f64 = 10.0;

/// km/h per m/s.
pub const KMH_PER_MPS: f64 = 3.6;
