//! Geodesy helpers
//!
//! Small, pure math utilities shared by the fusion engine and the extrapolator:
//! - geodetic ↔ unit-sphere Cartesian conversion (position averaging)
//! - great-circle distance and initial bearing (route walking)
//! - linear interpolation and projection onto polyline segments
//!
//! Trigonometry goes through `libm` so the core builds without `std`.

use crate::constants::geodesy::{EARTH_RADIUS_M, FULL_CIRCLE_DEG};
use crate::constants::fusion::POSITION_CANCELLATION_EPSILON;

/// A point on the globe in decimal degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    /// Latitude, -90..=90
    pub lat: f64,
    /// Longitude, -180..=180
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in degrees
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and within the coordinate ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Convert to a vector on the unit sphere
    pub fn to_cartesian(self) -> Cartesian {
        let lat = self.lat.to_radians();
        let lng = self.lng.to_radians();
        let cos_lat = libm::cos(lat);
        Cartesian {
            x: cos_lat * libm::cos(lng),
            y: cos_lat * libm::sin(lng),
            z: libm::sin(lat),
        }
    }

    /// Great-circle (haversine) distance in meters
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = lat2 - lat1;
        let dlng = (other.lng - self.lng).to_radians();

        let sin_dlat = libm::sin(dlat / 2.0);
        let sin_dlng = libm::sin(dlng / 2.0);
        let a = sin_dlat * sin_dlat + libm::cos(lat1) * libm::cos(lat2) * sin_dlng * sin_dlng;
        2.0 * EARTH_RADIUS_M * libm::atan2(libm::sqrt(a), libm::sqrt(1.0 - a))
    }

    /// Initial great-circle bearing towards `other`, degrees in [0, 360)
    pub fn bearing_to(self, other: GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let y = libm::sin(dlng) * libm::cos(lat2);
        let x = libm::cos(lat1) * libm::sin(lat2) - libm::sin(lat1) * libm::cos(lat2) * libm::cos(dlng);
        normalize_bearing(libm::atan2(y, x).to_degrees())
    }

    /// Point at `fraction` of the way to `other`, linear in latitude/longitude
    pub fn interpolate(self, other: GeoPoint, fraction: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * fraction,
            lng: self.lng + (other.lng - self.lng) * fraction,
        }
    }
}

/// Vector in earth-centered Cartesian space (unit sphere scale)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cartesian {
    /// Towards lat 0, lng 0
    pub x: f64,
    /// Towards lat 0, lng 90
    pub y: f64,
    /// Towards the north pole
    pub z: f64,
}

impl Cartesian {
    /// Euclidean length
    pub fn length(&self) -> f64 {
        libm::sqrt(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Move `k` of the way from `self` to `other`
    pub fn lerp(self, other: Cartesian, k: f64) -> Cartesian {
        Cartesian {
            x: (1.0 - k) * self.x + k * other.x,
            y: (1.0 - k) * self.y + k * other.y,
            z: (1.0 - k) * self.z + k * other.z,
        }
    }

    /// Convert back to geodetic coordinates, scaling by the vector's own length
    ///
    /// Returns `None` when the vector has (almost) zero length and therefore
    /// no direction.
    pub fn to_geo(self) -> Option<GeoPoint> {
        let len = self.length();
        if !(len > POSITION_CANCELLATION_EPSILON) {
            return None;
        }

        let (x, y, z) = (self.x / len, self.y / len, self.z / len);
        let lat = libm::atan2(z, libm::sqrt(x * x + y * y));
        let lng = libm::atan2(y, x);
        Some(GeoPoint::new(lat.to_degrees(), lng.to_degrees()))
    }
}

/// Wrap an angle in degrees into [0, 360)
pub fn normalize_bearing(degrees: f64) -> f64 {
    let wrapped = libm::fmod(degrees, FULL_CIRCLE_DEG);
    let wrapped = if wrapped < 0.0 { wrapped + FULL_CIRCLE_DEG } else { wrapped };
    // fmod of a tiny negative number can round up to exactly 360
    if wrapped >= FULL_CIRCLE_DEG {
        0.0
    } else {
        wrapped
    }
}

/// Projection of a point onto a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Position along the segment, 0 at `start`, 1 at `end`
    pub fraction: f64,
    /// Closest point on the segment
    pub point: GeoPoint,
    /// Distance from the projected point to the original point, meters
    pub distance_m: f64,
}

/// Project `point` onto the segment `start`→`end`
///
/// Uses a local equirectangular approximation, which is plenty for segments
/// of a road network.
pub fn project_onto_segment(point: GeoPoint, start: GeoPoint, end: GeoPoint) -> SegmentProjection {
    let scale = libm::cos(start.lat.to_radians());
    let dx = (end.lng - start.lng) * scale;
    let dy = end.lat - start.lat;
    let px = (point.lng - start.lng) * scale;
    let py = point.lat - start.lat;

    let len_sq = dx * dx + dy * dy;
    let fraction = if len_sq > 0.0 {
        ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let projected = start.interpolate(end, fraction);
    SegmentProjection {
        fraction,
        point: projected,
        distance_m: projected.distance_m(point),
    }
}
