//! Platform positioning providers
//!
//! ## Overview
//!
//! Platform location APIs call back on their own threads. Instead of letting
//! them write into shared raw slots, each provider gets a bounded channel:
//!
//! ```text
//! platform thread                      vehicle thread
//! ┌──────────────────┐  sync_channel  ┌────────────────┐  poll   ┌──────────┐
//! │ ProviderHandle   │───────────────→│ ProviderSource │────────→│ raw slot │
//! │ (Clone + Send)   │  whole messages│ (owns Location)│         └──────────┘
//! └──────────────────┘                └────────────────┘
//! ```
//!
//! Messages are moved whole through the channel, so the vehicle never sees a
//! half-written fix. The handle never blocks: a full channel is reported to
//! the caller as [`VehicleError::ChannelFull`].
//!
//! ## Provider Kinds
//!
//! | kind    | preference | fix time                   |
//! |---------|------------|----------------------------|
//! | GPS     | High       | time the vehicle received it |
//! | Network | Medium     | time reported by the provider |
//!
//! GPS receivers report their own clock, which may disagree with the system
//! clock; fixes are restamped so all sources share one time base.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};

use fixfuse_core::{
    constants::extrapolation::KMH_PER_MPS, GeoPoint, Location, Preference, Timestamp, Validity,
};

use crate::{
    error::{VehicleError, VehicleResult},
    source::{LocationSource, PollContext},
};

/// Kind of platform provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Satellite positioning
    Gps,
    /// Cell / Wi-Fi positioning
    Network,
}

impl ProviderKind {
    pub fn preference(self) -> Preference {
        match self {
            ProviderKind::Gps => Preference::High,
            ProviderKind::Network => Preference::Medium,
        }
    }

    fn restamps(self) -> bool {
        matches!(self, ProviderKind::Gps)
    }
}

/// One fix as delivered by a platform API
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderFix {
    pub position: GeoPoint,
    /// Meters
    pub accuracy_m: Option<f64>,
    /// Meters per second, as platform APIs report it
    pub speed_mps: Option<f64>,
    pub bearing_deg: Option<f64>,
    pub altitude_m: Option<f64>,
    pub fix_type: i32,
    /// Provider's own timestamp, ms since the Unix epoch
    pub time: Timestamp,
}

impl ProviderFix {
    /// Fix with position only
    pub fn at(position: GeoPoint, time: Timestamp) -> Self {
        Self {
            position,
            accuracy_m: None,
            speed_mps: None,
            bearing_deg: None,
            altitude_m: None,
            fix_type: 1,
            time,
        }
    }
}

/// Message from a provider thread to the vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProviderMessage {
    Fix(ProviderFix),
    /// Satellite status changed
    Satellites { in_view: u32, used: u32 },
    /// Provider stopped delivering fixes
    FixLost,
}

/// Sending side of a provider channel
#[derive(Debug, Clone)]
pub struct ProviderHandle {
    name: String,
    capacity: usize,
    sender: SyncSender<ProviderMessage>,
}

impl ProviderHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue a message without blocking
    pub fn send(&self, message: ProviderMessage) -> VehicleResult<()> {
        self.sender.try_send(message).map_err(|err| match err {
            TrySendError::Full(_) => VehicleError::ChannelFull {
                name: self.name.clone(),
                capacity: self.capacity,
            },
            TrySendError::Disconnected(_) => VehicleError::Disconnected {
                name: self.name.clone(),
            },
        })
    }

    pub fn report_fix(&self, fix: ProviderFix) -> VehicleResult<()> {
        self.send(ProviderMessage::Fix(fix))
    }

    pub fn report_satellites(&self, in_view: u32, used: u32) -> VehicleResult<()> {
        self.send(ProviderMessage::Satellites { in_view, used })
    }

    pub fn report_lost(&self) -> VehicleResult<()> {
        self.send(ProviderMessage::FixLost)
    }
}

/// Receiving side of a provider channel; polled by the vehicle
#[derive(Debug)]
pub struct ProviderSource {
    name: String,
    kind: ProviderKind,
    receiver: Receiver<ProviderMessage>,
    current: Location,
}

/// Create a provider source and its handle
pub fn provider_channel(
    name: impl Into<String>,
    kind: ProviderKind,
    capacity: usize,
) -> (ProviderSource, ProviderHandle) {
    let name = name.into();
    let (sender, receiver) = mpsc::sync_channel(capacity);
    let source = ProviderSource {
        name: name.clone(),
        kind,
        receiver,
        current: Location::with_preference(kind.preference()),
    };
    let handle = ProviderHandle {
        name,
        capacity,
        sender,
    };
    (source, handle)
}

impl ProviderSource {
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Apply one message; returns whether the raw location changed
    fn apply(&mut self, message: ProviderMessage, now: Timestamp) -> bool {
        match message {
            ProviderMessage::Fix(fix) => {
                let mut location = Location::with_preference(self.kind.preference());
                location.set_position(fix.position);
                if let Some(radius) = fix.accuracy_m {
                    location.set_accuracy(radius);
                }
                if let Some(mps) = fix.speed_mps {
                    location.set_speed(mps * KMH_PER_MPS);
                }
                if let Some(bearing) = fix.bearing_deg {
                    location.set_bearing(bearing);
                }
                if let Some(altitude) = fix.altitude_m {
                    location.set_altitude(altitude);
                }
                if let Some((in_view, used)) = self.current.sat_data() {
                    location.set_sat_data(in_view, used);
                }
                location.set_fix_type(fix.fix_type);
                location.set_fix_time(if self.kind.restamps() { now } else { fix.time });
                location.set_validity(Validity::Valid);
                if let Err(err) = location.sanitize() {
                    log::warn!("{}: ignoring fix: {}", self.name, err);
                    return false;
                }
                self.current = location;
                true
            }
            ProviderMessage::Satellites { in_view, used } => {
                if self.current.sat_data() == Some((in_view, used)) {
                    return false;
                }
                self.current.set_sat_data(in_view, used);
                true
            }
            ProviderMessage::FixLost => {
                if self.current.validity() == Validity::Invalid {
                    return false;
                }
                log::info!("{}: fix lost", self.name);
                self.current.set_validity(Validity::Invalid);
                self.current.set_fix_type(0);
                true
            }
        }
    }
}

impl LocationSource for ProviderSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn preference(&self) -> Preference {
        self.kind.preference()
    }

    fn poll(&mut self, ctx: &PollContext<'_>) -> Option<Location> {
        let mut changed = false;
        loop {
            match self.receiver.try_recv() {
                Ok(message) => changed |= self.apply(message, ctx.now),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("{}: all provider handles dropped", self.name);
                    break;
                }
            }
        }
        changed.then_some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(now: Timestamp, fused: &Location) -> PollContext<'_> {
        PollContext {
            now,
            route: None,
            profile: None,
            fused,
        }
    }

    #[test]
    fn gps_fix_is_restamped_and_converted() {
        let fused = Location::new();
        let (mut source, handle) = provider_channel("gps", ProviderKind::Gps, 4);

        let mut fix = ProviderFix::at(GeoPoint::new(1.0, 2.0), 5);
        fix.speed_mps = Some(10.0);
        handle.report_fix(fix).unwrap();

        let raw = source.poll(&ctx(9_000, &fused)).unwrap();
        assert_eq!(raw.fix_time(), 9_000);
        assert_eq!(raw.speed(), Some(36.0));
        assert_eq!(raw.preference(), Preference::High);
        assert_eq!(raw.validity(), Validity::Valid);
        assert!(source.poll(&ctx(9_500, &fused)).is_none());
    }

    #[test]
    fn network_fix_keeps_reported_time() {
        let fused = Location::new();
        let (mut source, handle) = provider_channel("net", ProviderKind::Network, 4);
        handle
            .report_fix(ProviderFix::at(GeoPoint::new(1.0, 2.0), 4_200))
            .unwrap();
        let raw = source.poll(&ctx(9_000, &fused)).unwrap();
        assert_eq!(raw.fix_time(), 4_200);
        assert_eq!(raw.preference(), Preference::Medium);
    }

    #[test]
    fn unchanged_satellites_are_ignored() {
        let fused = Location::new();
        let (mut source, handle) = provider_channel("gps", ProviderKind::Gps, 4);
        handle.report_satellites(9, 6).unwrap();
        assert_eq!(source.poll(&ctx(1, &fused)).unwrap().sat_data(), Some((9, 6)));

        handle.report_satellites(9, 6).unwrap();
        assert!(source.poll(&ctx(2, &fused)).is_none());
    }

    #[test]
    fn full_channel_is_reported() {
        let (_source, handle) = provider_channel("gps", ProviderKind::Gps, 1);
        handle.report_lost().unwrap();
        assert!(matches!(
            handle.report_lost(),
            Err(VehicleError::ChannelFull { capacity: 1, .. })
        ));
    }

    #[test]
    fn dropped_source_disconnects() {
        let (source, handle) = provider_channel("gps", ProviderKind::Gps, 1);
        drop(source);
        assert!(matches!(
            handle.report_lost(),
            Err(VehicleError::Disconnected { .. })
        ));
    }

    #[test]
    fn bad_fix_keeps_previous_location() {
        let fused = Location::new();
        let (mut source, handle) = provider_channel("gps", ProviderKind::Gps, 4);
        handle
            .report_fix(ProviderFix::at(GeoPoint::new(1.0, 2.0), 0))
            .unwrap();
        source.poll(&ctx(10, &fused)).unwrap();

        handle
            .report_fix(ProviderFix::at(GeoPoint::new(f64::NAN, 2.0), 0))
            .unwrap();
        assert!(source.poll(&ctx(20, &fused)).is_none());

        // satellite status still arrives on the last good fix
        handle.report_satellites(8, 5).unwrap();
        let raw = source.poll(&ctx(30, &fused)).unwrap();
        assert_eq!(raw.position(), Some(GeoPoint::new(1.0, 2.0)));
        assert_eq!(raw.sat_data(), Some((8, 5)));
    }

    #[test]
    fn fix_lost_invalidates_once() {
        let fused = Location::new();
        let (mut source, handle) = provider_channel("gps", ProviderKind::Gps, 4);
        handle
            .report_fix(ProviderFix::at(GeoPoint::new(1.0, 2.0), 0))
            .unwrap();
        handle.report_lost().unwrap();
        handle.report_lost().unwrap();

        let raw = source.poll(&ctx(10, &fused)).unwrap();
        assert_eq!(raw.validity(), Validity::Invalid);
        assert!(raw.has_position());
    }
}
