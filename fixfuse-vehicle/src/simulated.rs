//! Simulated (demo) source
//!
//! Drives the active route on its own: every poll extrapolates the source's
//! last location along the route for the time passed since its previous fix.
//! Useful for demos and for testing route guidance without a receiver.
//!
//! When a route appears, the first poll only resets the fix time to now.
//! Route computation can take a while, and extrapolating across that gap
//! would make the vehicle leap forward.

use fixfuse_core::{
    time::NO_FIX, ExtrapolationError, ExtrapolationOutcome, Extrapolator, GeoPoint, Location,
    Preference, Timestamp, Validity,
};

use crate::{
    config::DemoConfig,
    source::{LocationSource, PollContext},
};

/// Location source that dead-reckons along the route
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    name: String,
    extrapolator: Extrapolator,
    current: Location,
    route_ready: bool,
    placed: bool,
}

impl SimulatedSource {
    pub fn new(
        name: impl Into<String>,
        config: &DemoConfig,
    ) -> Result<Self, fixfuse_core::ConfigError> {
        config.validate()?;
        let mut current = Location::with_preference(Preference::Low);
        if let Some(start) = config.start {
            current.set_position(start);
        }
        Ok(Self {
            name: name.into(),
            extrapolator: Extrapolator::new(config.extrapolator())?,
            current,
            route_ready: false,
            placed: config.start.is_some(),
        })
    }

    /// Last simulated location
    pub fn location(&self) -> &Location {
        &self.current
    }

    fn place(&mut self, now: Timestamp) {
        self.current.set_fix_time(now);
        self.current.set_accuracy(self.extrapolator.config().simulated_accuracy_m);
        self.current.set_validity(Validity::Valid);
    }
}

impl LocationSource for SimulatedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn preference(&self) -> Preference {
        Preference::Low
    }

    fn poll(&mut self, ctx: &PollContext<'_>) -> Option<Location> {
        if self.placed {
            self.placed = false;
            if self.current.fix_time() == NO_FIX {
                self.place(ctx.now);
            }
            return Some(self.current);
        }

        let Some(route) = ctx.route else {
            self.route_ready = false;
            return None;
        };
        if !self.route_ready {
            log::debug!("{}: route ready, restarting simulation clock", self.name);
            self.route_ready = true;
            self.current.set_fix_time(ctx.now);
            return None;
        }

        match self
            .extrapolator
            .extrapolate(&mut self.current, Some(route), ctx.profile, ctx.now)
        {
            Ok(ExtrapolationOutcome::EnRoute { .. }) => Some(self.current),
            Ok(ExtrapolationOutcome::DestinationReached) => {
                log::debug!("{}: destination reached", self.name);
                Some(self.current)
            }
            Err(ExtrapolationError::NoStreetGeometry) => {
                log::warn!("{}: route has no street geometry", self.name);
                None
            }
            Err(err) => {
                log::debug!("{}: not extrapolating: {}", self.name, err);
                None
            }
        }
    }

    fn set_position(&mut self, position: GeoPoint, now: Timestamp) -> bool {
        self.current.set_position(position);
        self.place(now);
        self.placed = true;
        true
    }
}
