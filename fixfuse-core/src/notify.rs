//! Change tracking and attribute notifications
//!
//! After each fusion pass the engine reports which attributes of the fused
//! location changed as a [`ChangeSet`]. The set is turned into an ordered list
//! of [`PositionAttribute`]s that listeners are told about.
//!
//! Ordering rules:
//! - when the fused location becomes invalid only `Validity` is announced,
//!   since none of the other attributes can be trusted anymore
//! - otherwise `Validity`, `FixType`, `SatelliteCount`, `SatellitesUsed`,
//!   `Position` are announced in that order, each only if it changed
//! - with motion notifications enabled, `Speed`, `Bearing`, `Altitude` follow

use core::fmt;

use heapless::Vec;

use crate::{
    constants::buffers::MAX_NOTIFICATIONS,
    location::{Location, Validity},
};

/// Attribute of the fused location that listeners can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PositionAttribute {
    /// Validity changed
    Validity,
    /// Fix type changed
    FixType,
    /// Satellites in view changed
    SatelliteCount,
    /// Satellites used changed
    SatellitesUsed,
    /// Position changed
    Position,
    /// Speed changed
    Speed,
    /// Bearing changed
    Bearing,
    /// Altitude changed
    Altitude,
}

impl PositionAttribute {
    /// Name listeners subscribe by
    pub const fn name(self) -> &'static str {
        match self {
            PositionAttribute::Validity => "position_valid",
            PositionAttribute::FixType => "position_fix_type",
            PositionAttribute::SatelliteCount => "position_qual",
            PositionAttribute::SatellitesUsed => "position_sats_used",
            PositionAttribute::Position => "position_coord_geo",
            PositionAttribute::Speed => "position_speed",
            PositionAttribute::Bearing => "position_direction",
            PositionAttribute::Altitude => "position_height",
        }
    }

    const fn bit(self) -> u16 {
        match self {
            PositionAttribute::Validity => ChangeSet::VALIDITY,
            PositionAttribute::FixType => ChangeSet::FIX_TYPE,
            PositionAttribute::SatelliteCount => ChangeSet::SATS_IN_VIEW,
            PositionAttribute::SatellitesUsed => ChangeSet::SATS_USED,
            PositionAttribute::Position => ChangeSet::POSITION,
            PositionAttribute::Speed => ChangeSet::SPEED,
            PositionAttribute::Bearing => ChangeSet::BEARING,
            PositionAttribute::Altitude => ChangeSet::ALTITUDE,
        }
    }
}

impl fmt::Display for PositionAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const CORE_ORDER: [PositionAttribute; 5] = [
    PositionAttribute::Validity,
    PositionAttribute::FixType,
    PositionAttribute::SatelliteCount,
    PositionAttribute::SatellitesUsed,
    PositionAttribute::Position,
];

const MOTION_ORDER: [PositionAttribute; 3] = [
    PositionAttribute::Speed,
    PositionAttribute::Bearing,
    PositionAttribute::Altitude,
];

/// Ordered notifications for one fusion pass
pub type Notifications = Vec<PositionAttribute, MAX_NOTIFICATIONS>;

/// Attributes of the fused location that changed in one fusion pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeSet {
    bits: u16,
    validity: Validity,
}

impl ChangeSet {
    /// Validity bit
    pub const VALIDITY: u16 = 1 << 0;
    /// Fix type bit
    pub const FIX_TYPE: u16 = 1 << 1;
    /// Satellites in view bit
    pub const SATS_IN_VIEW: u16 = 1 << 2;
    /// Satellites used bit
    pub const SATS_USED: u16 = 1 << 3;
    /// Position bit
    pub const POSITION: u16 = 1 << 4;
    /// Speed bit
    pub const SPEED: u16 = 1 << 5;
    /// Bearing bit
    pub const BEARING: u16 = 1 << 6;
    /// Altitude bit
    pub const ALTITUDE: u16 = 1 << 7;
    /// Accuracy bit
    pub const ACCURACY: u16 = 1 << 8;
    /// Fix time bit
    pub const FIX_TIME: u16 = 1 << 9;

    /// Empty change set for a pass that produced `validity`
    pub const fn new(validity: Validity) -> Self {
        Self { bits: 0, validity }
    }

    /// Set `bit`
    pub fn mark(&mut self, bit: u16) {
        self.bits |= bit;
    }

    /// Mark `bit` if `changed` holds
    pub fn mark_if(&mut self, bit: u16, changed: bool) {
        if changed {
            self.bits |= bit;
        }
    }

    /// Raw bit pattern
    pub const fn bits(&self) -> u16 {
        self.bits
    }

    /// Whether `attribute` changed
    pub const fn contains(&self, attribute: PositionAttribute) -> bool {
        self.bits & attribute.bit() != 0
    }

    /// Nothing changed
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Whether the fix time changed
    pub const fn fix_time_changed(&self) -> bool {
        self.bits & Self::FIX_TIME != 0
    }

    /// Whether the accuracy radius changed
    pub const fn accuracy_changed(&self) -> bool {
        self.bits & Self::ACCURACY != 0
    }

    /// Validity of the fused location after the pass
    pub const fn validity(&self) -> Validity {
        self.validity
    }

    /// Attributes to announce, in announcement order
    pub fn notifications(&self, include_motion: bool) -> Notifications {
        let mut out = Notifications::new();

        if self.validity == Validity::Invalid {
            if self.contains(PositionAttribute::Validity) {
                let _ = out.push(PositionAttribute::Validity);
            }
            return out;
        }

        let motion: &[PositionAttribute] = if include_motion { &MOTION_ORDER } else { &[] };
        for attribute in CORE_ORDER.iter().chain(motion.iter()) {
            if self.contains(*attribute) {
                // capacity covers every attribute
                let _ = out.push(*attribute);
            }
        }
        out
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(u16, &str); 10] = [
            (ChangeSet::VALIDITY, "validity"),
            (ChangeSet::FIX_TYPE, "fix_type"),
            (ChangeSet::SATS_IN_VIEW, "sats_in_view"),
            (ChangeSet::SATS_USED, "sats_used"),
            (ChangeSet::POSITION, "position"),
            (ChangeSet::SPEED, "speed"),
            (ChangeSet::BEARING, "bearing"),
            (ChangeSet::ALTITUDE, "altitude"),
            (ChangeSet::ACCURACY, "accuracy"),
            (ChangeSet::FIX_TIME, "fix_time"),
        ];

        write!(f, "[{}]", self.validity)?;
        if self.is_empty() {
            return f.write_str(" unchanged");
        }
        for (bit, name) in NAMES {
            if self.bits & bit != 0 {
                write!(f, " {}", name)?;
            }
        }
        Ok(())
    }
}

/// Receives attribute change notifications for the fused location
pub trait AttributeListener {
    /// Called once per changed attribute, after the fused location is updated
    fn on_change(&mut self, attribute: PositionAttribute, location: &Location);
}

impl<F> AttributeListener for F
where
    F: FnMut(PositionAttribute, &Location),
{
    fn on_change(&mut self, attribute: PositionAttribute, location: &Location) {
        self(attribute, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_changed(validity: Validity) -> ChangeSet {
        let mut changes = ChangeSet::new(validity);
        changes.mark(0x3FF);
        changes
    }

    #[test]
    fn core_order() {
        let notes = all_changed(Validity::Valid).notifications(false);
        assert_eq!(&notes[..], &CORE_ORDER[..]);
    }

    #[test]
    fn motion_appended_when_enabled() {
        let notes = all_changed(Validity::Valid).notifications(true);
        assert_eq!(notes.len(), 8);
        assert_eq!(notes[5], PositionAttribute::Speed);
        assert_eq!(notes[7], PositionAttribute::Altitude);
    }

    #[test]
    fn invalid_announces_validity_only() {
        let notes = all_changed(Validity::Invalid).notifications(true);
        assert_eq!(&notes[..], &[PositionAttribute::Validity]);
    }

    #[test]
    fn unchanged_attributes_are_skipped() {
        let mut changes = ChangeSet::new(Validity::Valid);
        changes.mark(ChangeSet::POSITION);
        changes.mark(ChangeSet::SATS_USED);
        changes.mark(ChangeSet::FIX_TIME);
        let notes = changes.notifications(false);
        assert_eq!(
            &notes[..],
            &[PositionAttribute::SatellitesUsed, PositionAttribute::Position]
        );
        assert!(changes.fix_time_changed());
    }

    #[test]
    fn closures_are_listeners() {
        let mut seen = 0;
        {
            let mut listener = |_: PositionAttribute, _: &Location| seen += 1;
            listener.on_change(PositionAttribute::Position, &Location::new());
        }
        assert_eq!(seen, 1);
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_lists_changes() {
        let mut changes = ChangeSet::new(Validity::Valid);
        changes.mark(ChangeSet::POSITION);
        changes.mark(ChangeSet::ACCURACY);
        assert_eq!(changes.to_string(), "[valid] position accuracy");
        assert_eq!(ChangeSet::new(Validity::Invalid).to_string(), "[invalid] unchanged");
    }
}
