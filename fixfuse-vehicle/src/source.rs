//! Location sources
//!
//! Every positioning backend (platform GPS, network positioning, the demo
//! simulator, replay files) is a [`LocationSource`]. The vehicle polls each
//! source once per update; a source answers with a complete new raw location
//! or `None` when nothing changed since the last poll.

use fixfuse_core::{GeoPoint, Location, Preference, RoutePath, SpeedProfile, Timestamp};

/// Read-only view of the vehicle handed to sources during a poll
pub struct PollContext<'a> {
    /// Current time
    pub now: Timestamp,
    /// Active route, if any
    pub route: Option<&'a dyn RoutePath>,
    /// Speed profile of the vehicle
    pub profile: Option<&'a dyn SpeedProfile>,
    /// Fused location from the previous update
    pub fused: &'a Location,
}

/// A producer of raw locations
pub trait LocationSource: Send {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Trust level of this source's data
    fn preference(&self) -> Preference;

    /// Latest raw location if it changed since the previous poll
    fn poll(&mut self, ctx: &PollContext<'_>) -> Option<Location>;

    /// Place the source at a position, if it supports that
    ///
    /// Returns `true` when the position was accepted.
    fn set_position(&mut self, _position: GeoPoint, _now: Timestamp) -> bool {
        false
    }
}
