//! Common fixtures for integration tests
//!
//! Provides:
//! - Raw location builders for typical sources
//! - Small route layouts around a fixed origin
//! - Tolerance assertions and a deterministic RNG

#![allow(dead_code)]

use fixfuse_core::{
    GeoPoint, Location, Preference, Route, StreetType, Timestamp, Validity,
};

/// Start of simulated time
pub const T0: Timestamp = 1_700_000_000_000;

#[macro_export]
macro_rules! assert_within_tolerance {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let diff = ($actual - $expected).abs();
        if diff > $tolerance {
            panic!(
                "Value {} not within tolerance {} of expected {} (diff: {})",
                $actual, $tolerance, $expected, diff
            );
        }
    };
}

/// Builder for raw locations
pub struct FixBuilder {
    location: Location,
}

impl FixBuilder {
    pub fn new(preference: Preference) -> Self {
        let mut location = Location::with_preference(preference);
        location.set_validity(Validity::Valid);
        location.set_fix_time(T0);
        Self { location }
    }

    pub fn gps() -> Self {
        Self::new(Preference::High)
    }

    pub fn network() -> Self {
        Self::new(Preference::Medium)
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.location.set_position(GeoPoint::new(lat, lng));
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.location.set_accuracy(radius);
        self
    }

    pub fn speed(mut self, kmh: f64) -> Self {
        self.location.set_speed(kmh);
        self
    }

    pub fn bearing(mut self, deg: f64) -> Self {
        self.location.set_bearing(deg);
        self
    }

    pub fn altitude(mut self, m: f64) -> Self {
        self.location.set_altitude(m);
        self
    }

    pub fn sats(mut self, in_view: u32, used: u32) -> Self {
        self.location.set_sat_data(in_view, used);
        self
    }

    pub fn validity(mut self, validity: Validity) -> Self {
        self.location.set_validity(validity);
        self
    }

    pub fn fix_type(mut self, fix_type: i32) -> Self {
        self.location.set_fix_type(fix_type);
        self
    }

    pub fn fix_time(mut self, time: Timestamp) -> Self {
        self.location.set_fix_time(time);
        self
    }

    pub fn build(self) -> Location {
        self.location
    }
}

/// Points of an L-shaped street: east along the equator, then north
pub const ORIGIN: GeoPoint = GeoPoint::new(0.0, 0.0);
pub const CORNER: GeoPoint = GeoPoint::new(0.0, 0.01);
pub const END: GeoPoint = GeoPoint::new(0.01, 0.01);

/// Route along the L-shape, preceded by a route-start marker
pub fn l_route(street_type: StreetType, max_speed_kmh: Option<f64>) -> Route {
    Route::new()
        .with_start(&[GeoPoint::new(-0.0005, 0.0), ORIGIN])
        .with_street(street_type, max_speed_kmh, &[ORIGIN, CORNER])
        .with_street(street_type, max_speed_kmh, &[CORNER, END])
}

/// Milliseconds needed to drive `meters` at `kmh`
pub fn drive_ms(meters: f64, kmh: f64) -> u64 {
    (meters / (kmh / 3.6) * 1000.0).round() as u64
}

/// Deterministic random number generator for tests
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        // Xorshift
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_f64(&mut self) -> f64 {
        (self.next_u32() >> 8) as f64 / 16_777_216.0
    }

    pub fn gen_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}
