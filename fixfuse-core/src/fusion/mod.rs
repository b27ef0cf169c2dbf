//! Location Fusion Engine
//!
//! ## Overview
//!
//! Merges the raw locations of all sources into one authoritative fused
//! location. Sources update independently and at different rates, so every pass
//! starts from the full raw set and the previous fused location:
//!
//! ```text
//! GPS     (High)   ──┐
//! Network (Medium) ──┼─→ pass 1: classify ─→ pass 2: aggregate ─→ fused location
//! Demo    (Low)    ──┘                                              │
//!                                                                   ↓
//!                                                   ChangeSet ─→ notifications
//! ```
//!
//! ## Pass 1: classification
//!
//! For every attribute group (position, speed, bearing, altitude) the highest
//! effective preference among the entries supplying it wins. Entries below the
//! winner are ignored for that group; ties are all used. Metadata (fix type,
//! fix time, validity, preference) is inherited from the position contributors.
//!
//! ## Pass 2: aggregation
//!
//! | attribute  | single contributor | several contributors                    |
//! |------------|--------------------|-----------------------------------------|
//! | position   | copied             | precision-weighted, on the unit sphere  |
//! | speed      | copied             | mean weighted by 1 / radius             |
//! | bearing    | copied             | circular mean weighted by 1 / radius    |
//! | altitude   | copied             | mean weighted by 1 / radius             |
//! | satellites | from the contributor with the latest fix                     |
//!
//! Groups without contributors keep their previous value. Validity is always
//! recomputed and drops to `Invalid` once no source has usable data.
//!
//! ## Degenerate input
//!
//! Contributors pointing in opposite directions can cancel out (antipodal
//! positions, opposite bearings). The affected attribute is left unchanged for
//! the pass and the event is logged; fusion itself never fails.
//!
//! ## Usage Example
//!
//! ```rust
//! use fixfuse_core::{FusionEngine, GeoPoint, Location, PositionAttribute, Validity};
//!
//! let engine = FusionEngine::default();
//! let mut raw = Location::new();
//! raw.set_position(GeoPoint::new(10.0, 20.0));
//! raw.set_accuracy(5.0);
//! raw.set_validity(Validity::Valid);
//! raw.set_fix_time(1_000);
//!
//! let mut fused = Location::new();
//! let changes = engine.fuse(&[raw], &mut fused);
//! let notes = engine.notifications(&changes);
//! assert_eq!(&notes[..], &[PositionAttribute::Validity, PositionAttribute::Position]);
//! ```

mod aggregate;
mod classify;

use crate::{
    errors::{ConfigError, ConfigResult},
    location::{Location, Validity},
    notify::{AttributeListener, ChangeSet, Notifications},
};

use aggregate::{CircularMean, PositionEstimator, WeightedMean};
use classify::{classify, provenance, Classification};

/// Fusion settings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FusionConfig {
    /// Also announce speed, bearing and altitude changes
    pub notify_motion: bool,
    /// Smallest position change (degrees) that counts as a change; `None` for
    /// exact comparison
    pub change_epsilon: Option<f64>,
}

impl FusionConfig {
    /// Check that the change epsilon is finite and non-negative
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(eps) = self.change_epsilon {
            if !eps.is_finite() || eps < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "change_epsilon",
                    reason: "must be a finite, non-negative number of degrees",
                });
            }
        }
        Ok(())
    }
}

/// Stateless fusion engine; all state lives in the raw set and the fused location
#[derive(Debug, Clone, Default)]
pub struct FusionEngine {
    config: FusionConfig,
}

impl FusionEngine {
    /// Create an engine after validating `config`
    pub fn new(config: FusionConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Run one fusion pass, updating `fused` in place
    ///
    /// Returns every attribute that differs from its value before the pass.
    pub fn fuse(&self, raw: &[Location], fused: &mut Location) -> ChangeSet {
        let previous = *fused;
        let class = classify(raw);

        match provenance(raw, &class) {
            Some(prov) => {
                fused.fix_type = prov.fix_type;
                fused.fix_time = prov.fix_time;
                fused.validity = prov.validity;
                fused.preference = prov.preference;
                if let Some((in_view, used)) = prov.sat_data {
                    fused.set_sat_data(in_view, used);
                }
            }
            None => fused.validity = Validity::Invalid,
        }

        self.fuse_position(raw, &class, fused);
        self.fuse_motion(raw, &class, fused);

        let changes = self.diff(&previous, fused);
        log_debug!(
            "Fused {} raw locations ({} usable): {}",
            raw.len(),
            class.usable,
            changes
        );
        changes
    }

    fn fuse_position(&self, raw: &[Location], class: &Classification, fused: &mut Location) {
        if class.position.ties() == 0 {
            return;
        }

        let mut estimator = PositionEstimator::default();
        for location in raw {
            if let Some(point) = location.position() {
                if class.position.admits(location.effective_preference()) {
                    estimator.add(point, location.weighting_radius(), location.accuracy());
                }
            }
        }

        match estimator.finish() {
            Some(estimate) => {
                fused.set_position(estimate.point);
                match estimate.accuracy {
                    Some(radius) => fused.set_accuracy(radius),
                    None => fused.clear_accuracy(),
                }
            }
            None => log_error!(
                "Position contributions of {} sources cancel out, keeping previous position",
                estimator.count()
            ),
        }
    }

    fn fuse_motion(&self, raw: &[Location], class: &Classification, fused: &mut Location) {
        let mut speed = WeightedMean::default();
        let mut bearing = CircularMean::default();
        let mut altitude = WeightedMean::default();

        for location in raw {
            let eplev = location.effective_preference();
            let radius = location.weighting_radius();
            if let Some(v) = location.speed().filter(|_| class.speed.admits(eplev)) {
                speed.add(v, radius);
            }
            if let Some(v) = location.bearing().filter(|_| class.bearing.admits(eplev)) {
                bearing.add(v, radius);
            }
            if let Some(v) = location.altitude().filter(|_| class.altitude.admits(eplev)) {
                altitude.add(v, radius);
            }
        }

        if let Some(v) = speed.finish() {
            fused.set_speed(v);
        }
        if let Some(v) = altitude.finish() {
            fused.set_altitude(v);
        }
        match bearing.finish() {
            Some(v) => fused.set_bearing(v),
            None if class.bearing.ties() > 1 => log_error!(
                "Bearing contributions of {} sources cancel out, keeping previous bearing",
                class.bearing.ties()
            ),
            None => {}
        }
    }

    fn diff(&self, before: &Location, after: &Location) -> ChangeSet {
        let mut changes = ChangeSet::new(after.validity());

        changes.mark_if(ChangeSet::VALIDITY, before.validity() != after.validity());
        changes.mark_if(ChangeSet::FIX_TYPE, before.fix_type() != after.fix_type());
        changes.mark_if(ChangeSet::FIX_TIME, before.fix_time() != after.fix_time());

        let (sats_before, sats_after) = (before.sat_data(), after.sat_data());
        changes.mark_if(
            ChangeSet::SATS_IN_VIEW,
            sats_before.map(|s| s.0) != sats_after.map(|s| s.0),
        );
        changes.mark_if(
            ChangeSet::SATS_USED,
            sats_before.map(|s| s.1) != sats_after.map(|s| s.1),
        );

        let position_changed = match (before.position(), after.position()) {
            (Some(a), Some(b)) => match self.config.change_epsilon {
                Some(eps) => libm::fabs(a.lat - b.lat) > eps || libm::fabs(a.lng - b.lng) > eps,
                None => a != b,
            },
            (a, b) => a.is_some() != b.is_some(),
        };
        changes.mark_if(ChangeSet::POSITION, position_changed);
        changes.mark_if(ChangeSet::ACCURACY, before.accuracy() != after.accuracy());
        changes.mark_if(ChangeSet::SPEED, before.speed() != after.speed());
        changes.mark_if(ChangeSet::BEARING, before.bearing() != after.bearing());
        changes.mark_if(ChangeSet::ALTITUDE, before.altitude() != after.altitude());

        changes
    }

    /// Attributes to announce for a pass, in order
    pub fn notifications(&self, changes: &ChangeSet) -> Notifications {
        changes.notifications(self.config.notify_motion)
    }

    /// Deliver the notifications of a pass to `listener`
    pub fn notify<L>(&self, changes: &ChangeSet, fused: &Location, listener: &mut L)
    where
        L: AttributeListener + ?Sized,
    {
        for attribute in self.notifications(changes) {
            listener.on_change(attribute, fused);
        }
    }
}
