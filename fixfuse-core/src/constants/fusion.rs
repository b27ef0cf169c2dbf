//! Fusion Algorithm Constants
//!
//! Thresholds used by the fusion engine when weighting raw locations and when
//! deciding that an aggregate has degenerated.

// ===== ACCURACY WEIGHTING =====

/// Smallest accuracy radius accepted at ingestion, in meters.
///
/// Weights are `1 / radius` and the position estimator divides by `radius²`,
/// so a zero radius would give a single source infinite weight. Radii below
/// this floor are raised to it when a raw location is stored.
///
/// Source: roughly the best horizontal accuracy of consumer GNSS receivers
pub const MIN_ACCURACY_RADIUS_M: f64 = 1.0;

/// Radius assumed for a raw location that does not report its accuracy.
///
/// Only used for weighting; the fused location never reports this value as
/// its own accuracy unless a source supplied it.
///
/// Source: typical accuracy of cell/Wi-Fi network positioning
pub const UNKNOWN_ACCURACY_RADIUS_M: f64 = 50.0;

// ===== DEGENERACY DETECTION =====

/// Length below which a fused unit-sphere vector is considered cancelled.
///
/// Contributors on opposite sides of the globe average to (almost) the origin,
/// where the direction, and therefore the position, is undefined.
pub const POSITION_CANCELLATION_EPSILON: f64 = 1e-9;

/// Relative magnitude below which summed bearing vectors are considered cancelled.
///
/// Compared against the total weight: two equal-weight antipodal bearings sum
/// to a vector whose length is rounding noise relative to the weights.
pub const BEARING_CANCELLATION_EPSILON: f64 = 1e-9;
