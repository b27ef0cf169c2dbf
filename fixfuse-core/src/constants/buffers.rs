//! Buffer Sizes and Memory Constraints
//!
//! All collections touched by a fusion pass are fixed-capacity so a pass never
//! allocates.

/// Maximum number of raw location slots per vehicle.
///
/// Typical vehicles have 1-10 sources (GPS, network, dead reckoning, external
/// receivers). 16 leaves headroom while keeping the store under 2 KB.
///
/// Source: expected source count of 1-10 per vehicle
pub const MAX_RAW_LOCATIONS: usize = 16;

/// Maximum notifications raised by one fusion pass.
///
/// Five legacy attributes (validity, fix type, satellites in view, satellites
/// used, position) plus three motion attributes (speed, bearing, altitude).
pub const MAX_NOTIFICATIONS: usize = 8;

/// Default capacity of a per-source message channel.
///
/// Sources report roughly once per second and the vehicle drains every channel
/// on each ~1 s tick, so 8 pending messages absorbs several missed ticks.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 8;
