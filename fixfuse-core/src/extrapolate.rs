//! Dead Reckoning Along a Route
//!
//! ## Overview
//!
//! When no source delivers fresh fixes, the vehicle position is estimated by
//! driving the active route for the time that passed since the last fix:
//!
//! ```text
//!  last fix            now
//!     │◄─── elapsed ───►│
//!     ●━━━━━━━━━━●━━━━━━━━━○────────●
//!     snapped    vertex    estimate  route end
//! ```
//!
//! 1. The previous position is snapped onto the closest street segment.
//! 2. Legs are walked in route order; each leg costs
//!    `length / speed` of the elapsed budget.
//! 3. The leg that exhausts the budget is interpolated and the walk stops there.
//!    Running out of route stops at its final point with speed 0.
//!
//! ## Speed Resolution
//!
//! A fixed speed, when configured, is used everywhere. Otherwise each street
//! item's speed comes from the road profile for its street type combined with
//! the posted maximum according to the profile's [`MaxspeedHandling`]. With no
//! usable data at all the vehicle crawls at the off-road speed, which keeps it
//! moving forward.
//!
//! [`MaxspeedHandling`]: crate::route::MaxspeedHandling
//!
//! ## Result
//!
//! The location is updated in place and stamped with the simulated accuracy,
//! the current time and validity `Valid`. On any error it is left untouched.

use crate::{
    constants::extrapolation::{
        DECISECONDS_PER_SECOND, KMH_PER_MPS, OFFROAD_SPEED_KMH, SIMULATED_ACCURACY_M,
    },
    errors::{ConfigError, ConfigResult, ExtrapolationError, ExtrapolationResult},
    geo::{project_onto_segment, GeoPoint},
    location::{Location, Validity},
    route::{RouteItem, RoutePath, SpeedProfile},
    time::{elapsed_deciseconds, Timestamp, NO_FIX},
};

/// Dead-reckoning settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtrapolatorConfig {
    /// Speed to assume on every segment, km/h; `None` or 0 derives it from the
    /// road network
    pub fixed_speed_kmh: Option<f64>,
    /// Accuracy radius stamped on extrapolated locations, meters
    pub simulated_accuracy_m: f64,
    /// Fallback speed when nothing else is known, km/h
    pub offroad_speed_kmh: f64,
}

impl Default for ExtrapolatorConfig {
    fn default() -> Self {
        Self {
            fixed_speed_kmh: None,
            simulated_accuracy_m: SIMULATED_ACCURACY_M,
            offroad_speed_kmh: OFFROAD_SPEED_KMH,
        }
    }
}

impl ExtrapolatorConfig {
    /// Check that every speed and radius is usable
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(speed) = self.fixed_speed_kmh {
            if !speed.is_finite() || speed < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "fixed_speed_kmh",
                    reason: "must be a finite, non-negative speed",
                });
            }
        }
        if !(self.simulated_accuracy_m.is_finite() && self.simulated_accuracy_m > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "simulated_accuracy_m",
                reason: "must be positive",
            });
        }
        if !(self.offroad_speed_kmh.is_finite() && self.offroad_speed_kmh > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "offroad_speed_kmh",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

/// Where an extrapolation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtrapolationOutcome {
    /// Still driving
    EnRoute {
        /// Index of the route item the vehicle is on
        item: usize,
    },
    /// Ran out of route; the vehicle stands at the final point
    DestinationReached,
}

/// Start of the walk: a point on segment `segment` of item `item`
#[derive(Debug, Clone, Copy)]
struct Cursor {
    item: usize,
    segment: usize,
    point: GeoPoint,
}

/// Moves a location along a route for the time elapsed since its fix
#[derive(Debug, Clone, Default)]
pub struct Extrapolator {
    config: ExtrapolatorConfig,
}

impl Extrapolator {
    /// Create an extrapolator after validating `config`
    pub fn new(config: ExtrapolatorConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &ExtrapolatorConfig {
        &self.config
    }

    /// Advance `location` to its estimated position at `now`
    ///
    /// `profile` is only consulted when no fixed speed is configured.
    pub fn extrapolate(
        &self,
        location: &mut Location,
        route: Option<&dyn RoutePath>,
        profile: Option<&dyn SpeedProfile>,
        now: Timestamp,
    ) -> ExtrapolationResult<ExtrapolationOutcome> {
        if location.fix_time() == NO_FIX {
            return Err(ExtrapolationError::NoPriorFix);
        }
        let route = route.ok_or(ExtrapolationError::NoRoute)?;
        let start = start_cursor(route, location.position())?;

        let mut budget = elapsed_deciseconds(location.fix_time(), now);
        if budget <= 0.0 {
            return Ok(ExtrapolationOutcome::EnRoute { item: start.item });
        }

        let mut from = start.point;
        let mut item_index = start.item;
        let mut next_point = start.segment + 1;

        while let Some(item) = route.item(item_index) {
            let speed = self.resolve_speed(&item, profile);

            for &to in item.points.iter().skip(next_point) {
                let required = leg_deciseconds(from.distance_m(to), speed);
                if budget < required {
                    let fraction = budget / required;
                    location.set_position(from.interpolate(to, fraction));
                    location.set_speed(speed);
                    location.set_bearing(from.bearing_to(to));
                    self.stamp(location, now);
                    return Ok(ExtrapolationOutcome::EnRoute { item: item_index });
                }
                budget -= required;
                from = to;
            }

            match next_walkable(route, item_index + 1) {
                Some(next) => {
                    item_index = next;
                    next_point = 0;
                }
                None => break,
            }
        }

        log_debug!("Extrapolation reached the end of the route");
        location.set_position(from);
        location.set_speed(0.0);
        location.clear_bearing();
        self.stamp(location, now);
        Ok(ExtrapolationOutcome::DestinationReached)
    }

    /// Travel speed on a route item, km/h
    pub fn resolve_speed(&self, item: &RouteItem<'_>, profile: Option<&dyn SpeedProfile>) -> f64 {
        if let Some(fixed) = self.config.fixed_speed_kmh.filter(|s| *s > 0.0) {
            return fixed;
        }

        let posted = item.max_speed_kmh.filter(|s| s.is_finite() && *s > 0.0);
        let road = item
            .street_type
            .zip(profile)
            .and_then(|(street_type, profile)| profile.road_profile(street_type));

        let resolved = match road {
            Some(road) => road.resolve(item.max_speed_kmh),
            None => posted,
        };
        resolved.unwrap_or(self.config.offroad_speed_kmh)
    }

    fn stamp(&self, location: &mut Location, now: Timestamp) {
        location.set_accuracy(self.config.simulated_accuracy_m);
        location.set_fix_time(now);
        location.set_validity(Validity::Valid);
    }
}

fn leg_deciseconds(length_m: f64, speed_kmh: f64) -> f64 {
    length_m / (speed_kmh / KMH_PER_MPS) * DECISECONDS_PER_SECOND
}

fn next_walkable(route: &dyn RoutePath, from: usize) -> Option<usize> {
    (from..route.len()).find(|&i| route.item(i).is_some_and(|item| item.is_walkable()))
}

/// Snap `position` onto the closest street segment, or start at the first
/// street when the position is unknown
fn start_cursor(route: &dyn RoutePath, position: Option<GeoPoint>) -> ExtrapolationResult<Cursor> {
    let first = next_walkable(route, 0).ok_or(ExtrapolationError::NoStreetGeometry)?;

    let Some(position) = position else {
        let point = route
            .item(first)
            .and_then(|item| item.points.first().copied())
            .ok_or(ExtrapolationError::NoStreetGeometry)?;
        return Ok(Cursor {
            item: first,
            segment: 0,
            point,
        });
    };

    let mut best: Option<(f64, Cursor)> = None;
    for index in first..route.len() {
        let Some(item) = route.item(index).filter(|item| item.is_walkable()) else {
            continue;
        };
        for (segment, pair) in item.points.windows(2).enumerate() {
            let projection = project_onto_segment(position, pair[0], pair[1]);
            if best.map_or(true, |(d, _)| projection.distance_m < d) {
                best = Some((
                    projection.distance_m,
                    Cursor {
                        item: index,
                        segment,
                        point: projection.point,
                    },
                ));
            }
        }
    }
    best.map(|(_, cursor)| cursor)
        .ok_or(ExtrapolationError::NoStreetGeometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{MaxspeedHandling, RoadProfile, Route, StreetType};

    const A: GeoPoint = GeoPoint::new(0.0, 0.0);
    const B: GeoPoint = GeoPoint::new(0.0, 0.01);
    const C: GeoPoint = GeoPoint::new(0.01, 0.01);

    fn located(point: GeoPoint, fix_time: Timestamp) -> Location {
        let mut l = Location::new();
        l.set_position(point);
        l.set_fix_time(fix_time);
        l.set_validity(Validity::Valid);
        l
    }

    fn fixed(speed: f64) -> Extrapolator {
        Extrapolator::new(ExtrapolatorConfig {
            fixed_speed_kmh: Some(speed),
            ..ExtrapolatorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn requires_prior_fix() {
        let route = Route::new().with_street(StreetType::Street0, None, &[A, B]);
        let mut l = Location::new();
        let err = fixed(50.0).extrapolate(&mut l, Some(&route), None, 1_000);
        assert_eq!(err, Err(ExtrapolationError::NoPriorFix));
    }

    #[test]
    fn requires_route_geometry() {
        let mut l = located(A, 1_000);
        let ex = fixed(50.0);
        assert_eq!(
            ex.extrapolate(&mut l, None, None, 2_000),
            Err(ExtrapolationError::NoRoute)
        );

        let route = Route::new().with_start(&[A, B]).with_street(StreetType::Street0, None, &[A]);
        assert_eq!(
            ex.extrapolate(&mut l, Some(&route), None, 2_000),
            Err(ExtrapolationError::NoStreetGeometry)
        );
        assert_eq!(l, located(A, 1_000));
    }

    #[test]
    fn zero_elapsed_keeps_location() {
        let route = Route::new().with_street(StreetType::Street0, None, &[A, B]);
        let mut l = located(GeoPoint::new(0.0, 0.004), 5_000);
        let before = l;
        let outcome = fixed(50.0).extrapolate(&mut l, Some(&route), None, 5_000);
        assert_eq!(outcome, Ok(ExtrapolationOutcome::EnRoute { item: 0 }));
        assert_eq!(l, before);
    }

    #[test]
    fn moves_along_first_segment() {
        let route = Route::new().with_street(StreetType::Street0, None, &[A, B]);
        let length = A.distance_m(B);
        // 36 km/h = 10 m/s; a quarter of the segment
        let elapsed_ms = (length / 4.0 / 10.0 * 1000.0) as u64;

        let mut l = located(A, 1_000);
        let outcome = fixed(36.0).extrapolate(&mut l, Some(&route), None, 1_000 + elapsed_ms);
        assert_eq!(outcome, Ok(ExtrapolationOutcome::EnRoute { item: 0 }));

        let p = l.position().unwrap();
        assert!((p.lng - 0.0025).abs() < 1e-5, "got {:?}", p);
        assert_eq!(l.speed(), Some(36.0));
        assert!((l.bearing().unwrap() - 90.0).abs() < 1e-6);
        assert_eq!(l.accuracy(), Some(SIMULATED_ACCURACY_M));
        assert_eq!(l.fix_time(), 1_000 + elapsed_ms);
    }

    #[test]
    fn turns_onto_next_leg() {
        let route = Route::new()
            .with_start(&[GeoPoint::new(-0.001, 0.0), A])
            .with_street(StreetType::Street0, None, &[A, B])
            .with_other(&[B])
            .with_street(StreetType::Street0, None, &[B, C]);
        let first_leg = A.distance_m(B);
        let elapsed_ms = ((first_leg + 100.0) / 10.0 * 1000.0) as u64;

        let mut l = located(A, 1_000);
        let outcome = fixed(36.0).extrapolate(&mut l, Some(&route), None, 1_000 + elapsed_ms);
        assert_eq!(outcome, Ok(ExtrapolationOutcome::EnRoute { item: 3 }));
        assert!((l.bearing().unwrap() - 0.0).abs() < 1e-6);
        let travelled = B.distance_m(l.position().unwrap());
        assert!((travelled - 100.0).abs() < 1.0, "travelled {}", travelled);
    }

    #[test]
    fn stops_at_destination() {
        let route = Route::new().with_street(StreetType::Street0, None, &[A, B, C]);
        let mut l = located(A, 1_000);
        let outcome = fixed(100.0).extrapolate(&mut l, Some(&route), None, 10_000_000);
        assert_eq!(outcome, Ok(ExtrapolationOutcome::DestinationReached));
        assert_eq!(l.position(), Some(C));
        assert_eq!(l.speed(), Some(0.0));
        assert_eq!(l.bearing(), None);
        assert_eq!(l.validity(), Validity::Valid);
    }

    #[test]
    fn unknown_position_starts_at_first_street() {
        let route = Route::new()
            .with_start(&[GeoPoint::new(5.0, 5.0)])
            .with_street(StreetType::Street0, None, &[A, B]);
        let mut l = Location::new();
        l.set_fix_time(1_000);
        let outcome = fixed(36.0).extrapolate(&mut l, Some(&route), None, 1_100);
        assert_eq!(outcome, Ok(ExtrapolationOutcome::EnRoute { item: 1 }));
        // 0.1 s at 10 m/s
        let travelled = A.distance_m(l.position().unwrap());
        assert!((travelled - 1.0).abs() < 1e-3);
    }

    #[test]
    fn speed_resolution() {
        let ex = Extrapolator::default();
        let points = [A, B];
        let item = RouteItem {
            kind: crate::route::RouteItemKind::Street,
            street_type: Some(StreetType::Street2City),
            max_speed_kmh: Some(30.0),
            points: &points,
        };
        let profile = |_: StreetType| Some(RoadProfile::new(50.0, MaxspeedHandling::PreferLower));
        let none = |_: StreetType| -> Option<RoadProfile> { None };

        assert_eq!(ex.resolve_speed(&item, Some(&profile)), 30.0);
        assert_eq!(ex.resolve_speed(&item, Some(&none)), 30.0);
        assert_eq!(ex.resolve_speed(&item, None), 30.0);

        let unsigned = RouteItem {
            max_speed_kmh: None,
            ..item
        };
        assert_eq!(ex.resolve_speed(&unsigned, None), OFFROAD_SPEED_KMH);
        assert_eq!(fixed(70.0).resolve_speed(&unsigned, Some(&profile)), 70.0);
        // zero fixed speed derives from the network
        assert_eq!(fixed(0.0).resolve_speed(&unsigned, Some(&profile)), 50.0);
    }

    #[test]
    fn config_validation() {
        assert!(ExtrapolatorConfig::default().validate().is_ok());
        let bad = ExtrapolatorConfig {
            offroad_speed_kmh: 0.0,
            ..ExtrapolatorConfig::default()
        };
        assert!(Extrapolator::new(bad).is_err());
        let bad = ExtrapolatorConfig {
            fixed_speed_kmh: Some(f64::NAN),
            ..ExtrapolatorConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
