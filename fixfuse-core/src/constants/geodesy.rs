//! Earth Model Constants

/// Mean earth radius in meters (IUGG).
///
/// Used for great-circle distances. Dead reckoning only needs segment lengths
/// accurate to a fraction of a percent, so a spherical model is sufficient.
///
/// Source: IUGG mean radius R1
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Degrees in a full circle.
pub const FULL_CIRCLE_DEG: f64 = 360.0;
