//! The vehicle: sources, raw store, fused location and listeners
//!
//! ## Update Cycle
//!
//! [`Vehicle::update`] is called by the owner's timer (every
//! `interval_ms`) or right after a provider reported something:
//!
//! ```text
//! for each source:  poll ──→ Some(location) ──→ store.update(slot)
//! fusion:           engine.fuse(raw store, fused) ──→ ChangeSet
//! listeners:        one callback per changed attribute, in order
//! ```
//!
//! Only the vehicle's thread touches the raw store; providers on other threads
//! go through their [`ProviderHandle`].

use fixfuse_core::{
    AttributeListener, ChangeSet, FusionEngine, GeoPoint, Location, RawLocationStore, RoutePath,
    SlotId, SpeedProfile, TimeSource, Timestamp,
};

use crate::{
    config::VehicleConfig,
    error::VehicleResult,
    profile::VehicleProfile,
    provider::{provider_channel, ProviderHandle, ProviderKind},
    simulated::SimulatedSource,
    source::{LocationSource, PollContext},
};

struct SourceSlot {
    slot: SlotId,
    source: Box<dyn LocationSource>,
}

/// One vehicle and its fused location
pub struct Vehicle {
    config: VehicleConfig,
    engine: FusionEngine,
    store: RawLocationStore,
    sources: Vec<SourceSlot>,
    fused: Location,
    fix_time_iso8601: Option<String>,
    listeners: Vec<Box<dyn AttributeListener + Send>>,
    route: Option<Box<dyn RoutePath + Send>>,
    profile: VehicleProfile,
}

impl Vehicle {
    /// Build a vehicle; adds the demo source when the config has one
    pub fn new(config: VehicleConfig) -> VehicleResult<Self> {
        config.validate()?;
        let engine = FusionEngine::new(config.fusion)?;
        let profile = config.profile.clone();

        let mut vehicle = Self {
            config,
            engine,
            store: RawLocationStore::new(),
            sources: Vec::new(),
            fused: Location::new(),
            fix_time_iso8601: None,
            listeners: Vec::new(),
            route: None,
            profile,
        };

        if let Some(demo) = vehicle.config.demo.clone() {
            let source = SimulatedSource::new(format!("{}/demo", vehicle.config.name), &demo)?;
            vehicle.add_source(Box::new(source))?;
        }
        log::info!(
            "Vehicle '{}' ready with {} source(s)",
            vehicle.config.name,
            vehicle.sources.len()
        );
        Ok(vehicle)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    /// Register a source and give it a raw slot
    pub fn add_source(&mut self, source: Box<dyn LocationSource>) -> VehicleResult<SlotId> {
        let slot = self.store.register(source.preference())?;
        log::debug!(
            "{}: source '{}' ({}) in slot {}",
            self.config.name,
            source.name(),
            source.preference().name(),
            slot.index()
        );
        self.sources.push(SourceSlot { slot, source });
        Ok(slot)
    }

    /// Register a platform provider; the handle may be moved to another thread
    pub fn add_provider(
        &mut self,
        name: impl Into<String>,
        kind: ProviderKind,
    ) -> VehicleResult<ProviderHandle> {
        let (source, handle) = provider_channel(name, kind, self.config.channel_capacity);
        self.add_source(Box::new(source))?;
        Ok(handle)
    }

    /// Listen for changes of the fused location
    pub fn subscribe<L>(&mut self, listener: L)
    where
        L: AttributeListener + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn set_route<R>(&mut self, route: R)
    where
        R: RoutePath + Send + 'static,
    {
        self.route = Some(Box::new(route));
    }

    pub fn clear_route(&mut self) {
        self.route = None;
    }

    pub fn set_profile(&mut self, profile: VehicleProfile) {
        self.profile = profile;
    }

    pub fn profile(&self) -> &VehicleProfile {
        &self.profile
    }

    /// Place the vehicle manually; takes effect on the next update
    ///
    /// Returns `false` if no source accepts manual positions.
    pub fn set_position(&mut self, position: GeoPoint, now: Timestamp) -> bool {
        let mut accepted = false;
        for entry in &mut self.sources {
            accepted |= entry.source.set_position(position, now);
        }
        if !accepted {
            log::debug!("{}: no source accepts a manual position", self.config.name);
        }
        accepted
    }

    /// Fused location
    pub fn location(&self) -> &Location {
        &self.fused
    }

    /// Fix time of the fused location as `YYYY-MM-DDTHH:MM:SSZ`
    pub fn fix_time_iso8601(&self) -> Option<&str> {
        self.fix_time_iso8601.as_deref()
    }

    /// Raw locations in slot order
    pub fn raw_locations(&self) -> &[Location] {
        self.store.as_slice()
    }

    /// Poll every source, fuse, and notify listeners
    pub fn update(&mut self, now: Timestamp) -> ChangeSet {
        let ctx = PollContext {
            now,
            route: self.route.as_deref().map(|r| r as &dyn RoutePath),
            profile: Some(&self.profile as &dyn SpeedProfile),
            fused: &self.fused,
        };

        for entry in &mut self.sources {
            let Some(location) = entry.source.poll(&ctx) else {
                continue;
            };
            if let Err(err) = self.store.update(entry.slot, location) {
                log::warn!(
                    "{}: dropped location from '{}': {}",
                    self.config.name,
                    entry.source.name(),
                    err
                );
            }
        }

        let changes = self.engine.fuse(self.store.as_slice(), &mut self.fused);
        if changes.fix_time_changed() {
            self.fix_time_iso8601 = format_fix_time(self.fused.fix_time());
        }

        for attribute in self.engine.notifications(&changes) {
            for listener in &mut self.listeners {
                listener.on_change(attribute, &self.fused);
            }
        }
        changes
    }

    /// [`update`](Self::update) at the time given by `clock`
    pub fn update_with(&mut self, clock: &dyn TimeSource) -> ChangeSet {
        self.update(clock.now())
    }
}

/// Format a fix time as ISO 8601 UTC; `None` for the no-fix sentinel
pub fn format_fix_time(fix_time: Timestamp) -> Option<String> {
    if fix_time == fixfuse_core::time::NO_FIX {
        return None;
    }
    let millis = i64::try_from(fix_time).ok()?;
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}
