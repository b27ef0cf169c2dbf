//! Location Data Model
//!
//! ## Overview
//!
//! A [`Location`] describes the movement of the vehicle at one point in time,
//! together with the metadata needed to decide how far it can be trusted. It may
//! come straight from a positioning source (GPS, network) or be computed
//! (fused, extrapolated).
//!
//! Three members decide if and how a location can be used:
//!
//! 1. **Validity**: whether the data is valid, and how it was obtained
//! 2. **Fix time**: when it was obtained. Validity refers to that moment, so a
//!    "valid" fix from long ago may still be stale
//! 3. **Presence flags**: which attributes the location actually supplies
//!
//! ```text
//! Location
//! ├── position (lat, lng)       ← PresenceFlags::POSITION
//! ├── speed (km/h)              ← PresenceFlags::SPEED
//! ├── bearing (deg)             ← PresenceFlags::BEARING
//! ├── altitude (m)              ← PresenceFlags::ALTITUDE
//! ├── accuracy radius (m)       ← PresenceFlags::ACCURACY
//! ├── satellites in view / used ← PresenceFlags::SAT_DATA
//! ├── fix type, fix time
//! ├── validity
//! └── preference
//! ```
//!
//! Getters for flagged attributes return `Option`, so a field whose presence
//! bit is unset cannot be read by accident.

use core::cmp::Ordering;
use core::fmt;

use crate::{
    constants::fusion::{MIN_ACCURACY_RADIUS_M, UNKNOWN_ACCURACY_RADIUS_M},
    errors::{LocationError, LocationResult},
    geo::GeoPoint,
    preference::EffectivePreference,
    time::{delta_ms, Timestamp, NO_FIX},
};

/// How a location was obtained and whether it can be used
///
/// The discriminant is a stable wire code and is NOT the quality rank:
/// `Static` has code 1 but ranks above both extrapolated variants. Compare
/// validities with `Ord`, which ranks them
/// `Invalid < ExtrapolatedTime < ExtrapolatedSpatial < Static < Valid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum Validity {
    /// Must not be used
    #[default]
    Invalid = 0,
    /// Position is fixed (e.g. configured manually) and known to be correct
    Static = 1,
    /// Extrapolated from an earlier fix using elapsed time only
    ExtrapolatedTime = 2,
    /// Extrapolated using spatial information (e.g. a route)
    ExtrapolatedSpatial = 3,
    /// Measured directly
    Valid = 4,
}

impl Validity {
    /// Stable numeric code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a numeric code
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Validity::Invalid),
            1 => Some(Validity::Static),
            2 => Some(Validity::ExtrapolatedTime),
            3 => Some(Validity::ExtrapolatedSpatial),
            4 => Some(Validity::Valid),
            _ => None,
        }
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Validity::Invalid => "invalid",
            Validity::Static => "static",
            Validity::ExtrapolatedTime => "extrapolated_time",
            Validity::ExtrapolatedSpatial => "extrapolated_spatial",
            Validity::Valid => "valid",
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Validity::Invalid => 0,
            Validity::ExtrapolatedTime => 1,
            Validity::ExtrapolatedSpatial => 2,
            Validity::Static => 3,
            Validity::Valid => 4,
        }
    }
}

impl Ord for Validity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Validity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static trust ranking of a positioning source
///
/// When raw locations are fused, data of the highest (effective) preference
/// wins and lower-ranked data for the same attribute is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum Preference {
    /// Least trusted
    #[default]
    Low = 0,
    /// E.g. network positioning
    Medium = 1,
    /// E.g. GNSS
    High = 2,
}

impl Preference {
    /// Numeric level used for effective preference arithmetic
    pub const fn level(self) -> i32 {
        self as i32
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Preference::Low => "low",
            Preference::Medium => "medium",
            Preference::High => "high",
        }
    }
}

/// Bit flags for the attributes a location supplies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresenceFlags(u8);

impl PresenceFlags {
    /// Position is present
    pub const POSITION: Self = Self(1 << 0);
    /// Speed is present
    pub const SPEED: Self = Self(1 << 1);
    /// Bearing is present
    pub const BEARING: Self = Self(1 << 2);
    /// Altitude is present
    pub const ALTITUDE: Self = Self(1 << 3);
    /// Accuracy radius is present
    pub const ACCURACY: Self = Self(1 << 4);
    /// Satellite counts are present
    pub const SAT_DATA: Self = Self(1 << 5);

    /// No attribute present
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every attribute present
    pub const fn all() -> Self {
        Self(0b11_1111)
    }

    /// Raw bit pattern
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Mark the attributes in `other` present
    pub fn set(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Mark the attributes in `other` absent
    pub fn clear(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Whether every attribute in `other` is present
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

/// One location of the vehicle, raw or fused
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub(crate) position: GeoPoint,
    /// km/h
    pub(crate) speed: f64,
    /// degrees
    pub(crate) bearing: f64,
    /// meters
    pub(crate) altitude: f64,
    /// meters
    pub(crate) accuracy: f64,
    pub(crate) sats_in_view: u32,
    pub(crate) sats_used: u32,
    pub(crate) fix_type: i32,
    pub(crate) fix_time: Timestamp,
    pub(crate) flags: PresenceFlags,
    pub(crate) validity: Validity,
    pub(crate) preference: Preference,
}

impl Location {
    /// Empty, invalid location with no attributes
    pub const fn new() -> Self {
        Self {
            position: GeoPoint::new(0.0, 0.0),
            speed: 0.0,
            bearing: 0.0,
            altitude: 0.0,
            accuracy: 0.0,
            sats_in_view: 0,
            sats_used: 0,
            fix_type: 0,
            fix_time: NO_FIX,
            flags: PresenceFlags::empty(),
            validity: Validity::Invalid,
            preference: Preference::Low,
        }
    }

    /// Empty location that will carry the given preference
    pub const fn with_preference(preference: Preference) -> Self {
        let mut location = Self::new();
        location.preference = preference;
        location
    }

    // ----- position -----

    /// Position, if supplied
    pub fn position(&self) -> Option<GeoPoint> {
        self.flags.contains(PresenceFlags::POSITION).then_some(self.position)
    }

    /// Whether a position is present
    pub fn has_position(&self) -> bool {
        self.flags.contains(PresenceFlags::POSITION)
    }

    /// Set the position
    pub fn set_position(&mut self, position: GeoPoint) {
        self.position = position;
        self.flags.set(PresenceFlags::POSITION);
    }

    /// Remove the position
    pub fn clear_position(&mut self) {
        self.flags.clear(PresenceFlags::POSITION);
    }

    // ----- speed -----

    /// Speed in km/h, if supplied
    pub fn speed(&self) -> Option<f64> {
        self.flags.contains(PresenceFlags::SPEED).then_some(self.speed)
    }

    /// Whether a speed is present
    pub fn has_speed(&self) -> bool {
        self.flags.contains(PresenceFlags::SPEED)
    }

    /// Set the speed in km/h
    pub fn set_speed(&mut self, speed_kmh: f64) {
        self.speed = speed_kmh;
        self.flags.set(PresenceFlags::SPEED);
    }

    /// Remove the speed
    pub fn clear_speed(&mut self) {
        self.flags.clear(PresenceFlags::SPEED);
    }

    // ----- bearing -----

    /// Bearing in degrees, if supplied
    pub fn bearing(&self) -> Option<f64> {
        self.flags.contains(PresenceFlags::BEARING).then_some(self.bearing)
    }

    /// Whether a bearing is present
    pub fn has_bearing(&self) -> bool {
        self.flags.contains(PresenceFlags::BEARING)
    }

    /// Set the bearing in degrees
    pub fn set_bearing(&mut self, bearing_deg: f64) {
        self.bearing = bearing_deg;
        self.flags.set(PresenceFlags::BEARING);
    }

    /// Remove the bearing
    pub fn clear_bearing(&mut self) {
        self.flags.clear(PresenceFlags::BEARING);
    }

    // ----- altitude -----

    /// Altitude in meters, if supplied
    pub fn altitude(&self) -> Option<f64> {
        self.flags.contains(PresenceFlags::ALTITUDE).then_some(self.altitude)
    }

    /// Whether an altitude is present
    pub fn has_altitude(&self) -> bool {
        self.flags.contains(PresenceFlags::ALTITUDE)
    }

    /// Set the altitude in meters
    pub fn set_altitude(&mut self, altitude_m: f64) {
        self.altitude = altitude_m;
        self.flags.set(PresenceFlags::ALTITUDE);
    }

    /// Remove the altitude
    pub fn clear_altitude(&mut self) {
        self.flags.clear(PresenceFlags::ALTITUDE);
    }

    // ----- accuracy -----

    /// Position accuracy radius in meters, if supplied
    ///
    /// The radius around the position that the true position is unlikely
    /// (usually 5%) to lie outside of.
    pub fn accuracy(&self) -> Option<f64> {
        self.flags.contains(PresenceFlags::ACCURACY).then_some(self.accuracy)
    }

    /// Whether an accuracy radius is present
    pub fn has_accuracy(&self) -> bool {
        self.flags.contains(PresenceFlags::ACCURACY)
    }

    /// Set the accuracy radius in meters
    pub fn set_accuracy(&mut self, radius_m: f64) {
        self.accuracy = radius_m;
        self.flags.set(PresenceFlags::ACCURACY);
    }

    /// Remove the accuracy radius
    pub fn clear_accuracy(&mut self) {
        self.flags.clear(PresenceFlags::ACCURACY);
    }

    // ----- satellites -----

    /// Satellites in view and used for the fix, if supplied
    pub fn sat_data(&self) -> Option<(u32, u32)> {
        self.flags
            .contains(PresenceFlags::SAT_DATA)
            .then_some((self.sats_in_view, self.sats_used))
    }

    /// Whether satellite counts are present
    pub fn has_sat_data(&self) -> bool {
        self.flags.contains(PresenceFlags::SAT_DATA)
    }

    /// Set satellites in view and used
    pub fn set_sat_data(&mut self, in_view: u32, used: u32) {
        self.sats_in_view = in_view;
        self.sats_used = used;
        self.flags.set(PresenceFlags::SAT_DATA);
    }

    /// Remove the satellite counts
    pub fn clear_sat_data(&mut self) {
        self.flags.clear(PresenceFlags::SAT_DATA);
    }

    // ----- metadata -----

    /// Fix type; 0 means no fix, nonzero values denote fix quality levels
    pub fn fix_type(&self) -> i32 {
        self.fix_type
    }

    /// Set the fix type
    pub fn set_fix_type(&mut self, fix_type: i32) {
        self.fix_type = fix_type;
    }

    /// Time of the fix, milliseconds since the Unix epoch (0 = never)
    pub fn fix_time(&self) -> Timestamp {
        self.fix_time
    }

    /// Set the fix time
    pub fn set_fix_time(&mut self, fix_time: Timestamp) {
        self.fix_time = fix_time;
    }

    /// Age of the fix at `now`, `None` if there never was one
    pub fn age_ms(&self, now: Timestamp) -> Option<u64> {
        (self.fix_time != NO_FIX).then(|| delta_ms(self.fix_time, now))
    }

    /// Validity of the fix
    pub fn validity(&self) -> Validity {
        self.validity
    }

    /// Set the validity
    pub fn set_validity(&mut self, validity: Validity) {
        self.validity = validity;
    }

    /// Preference of the producing source
    pub fn preference(&self) -> Preference {
        self.preference
    }

    /// Set the preference
    pub fn set_preference(&mut self, preference: Preference) {
        self.preference = preference;
    }

    /// Attributes present
    pub fn flags(&self) -> PresenceFlags {
        self.flags
    }

    /// Preference adjusted for validity; basis of all fusion comparisons
    pub fn effective_preference(&self) -> EffectivePreference {
        EffectivePreference::of(self.preference, self.validity)
    }

    /// Radius used to weight this location against others
    ///
    /// Missing accuracy counts as [`UNKNOWN_ACCURACY_RADIUS_M`]; anything
    /// below [`MIN_ACCURACY_RADIUS_M`] is raised to it so weights stay finite.
    pub fn weighting_radius(&self) -> f64 {
        if self.has_accuracy() {
            self.accuracy.max(MIN_ACCURACY_RADIUS_M)
        } else {
            UNKNOWN_ACCURACY_RADIUS_M
        }
    }

    /// Check a raw location before it is stored
    ///
    /// Rejects non-finite values and impossible coordinates, and floors a
    /// zero or tiny accuracy radius to [`MIN_ACCURACY_RADIUS_M`].
    pub fn sanitize(&mut self) -> LocationResult<()> {
        if self.has_position() && !self.position.is_valid() {
            return Err(LocationError::InvalidPosition {
                lat: self.position.lat,
                lng: self.position.lng,
            });
        }
        if self.has_accuracy() {
            if !self.accuracy.is_finite() || self.accuracy < 0.0 {
                return Err(LocationError::InvalidAccuracy { radius: self.accuracy });
            }
            if self.accuracy < MIN_ACCURACY_RADIUS_M {
                log_debug!(
                    "Accuracy radius {} m floored to {} m",
                    self.accuracy, MIN_ACCURACY_RADIUS_M
                );
                self.accuracy = MIN_ACCURACY_RADIUS_M;
            }
        }
        if self.has_speed() && !self.speed.is_finite() {
            return Err(LocationError::InvalidValue { field: "speed" });
        }
        if self.has_bearing() && !self.bearing.is_finite() {
            return Err(LocationError::InvalidValue { field: "bearing" });
        }
        if self.has_altitude() && !self.altitude.is_finite() {
            return Err(LocationError::InvalidValue { field: "altitude" });
        }
        Ok(())
    }
}
