//! Pass 1: classification and provenance
//!
//! Finds, per attribute group, the highest effective preference among the raw
//! locations that supply the attribute. Only entries at that level take part in
//! pass 2 for the group.

use crate::{
    location::{Location, Preference, Validity},
    preference::EffectivePreference,
    time::{Timestamp, NO_FIX},
};

/// Winning effective preference of one attribute group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GroupWinner {
    best: EffectivePreference,
    ties: usize,
}

impl Default for GroupWinner {
    fn default() -> Self {
        Self {
            best: EffectivePreference::INVALID,
            ties: 0,
        }
    }
}

impl GroupWinner {
    fn observe(&mut self, eplev: EffectivePreference) {
        if eplev > self.best {
            self.best = eplev;
            self.ties = 1;
        } else if eplev == self.best {
            self.ties += 1;
        }
    }

    /// Whether an entry at `eplev` contributes to this group
    pub fn admits(&self, eplev: EffectivePreference) -> bool {
        !eplev.is_invalid() && eplev == self.best
    }

    /// Number of contributors
    pub fn ties(&self) -> usize {
        self.ties
    }

    #[cfg(test)]
    pub fn best(&self) -> EffectivePreference {
        self.best
    }
}

/// Result of pass 1
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Classification {
    pub position: GroupWinner,
    pub speed: GroupWinner,
    pub bearing: GroupWinner,
    pub altitude: GroupWinner,
    /// Entries with a usable validity
    pub usable: usize,
}

/// Run pass 1 over the raw set
pub(crate) fn classify(raw: &[Location]) -> Classification {
    let mut class = Classification::default();

    for location in raw {
        let eplev = location.effective_preference();
        if eplev.is_invalid() {
            continue;
        }
        class.usable += 1;
        if location.has_position() {
            class.position.observe(eplev);
        }
        if location.has_speed() {
            class.speed.observe(eplev);
        }
        if location.has_bearing() {
            class.bearing.observe(eplev);
        }
        if location.has_altitude() {
            class.altitude.observe(eplev);
        }
    }
    class
}

/// Metadata the fused location inherits from its contributors
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Provenance {
    pub fix_type: i32,
    pub fix_time: Timestamp,
    pub validity: Validity,
    pub preference: Preference,
    /// (in view, used) of the most recent contributor with satellite data
    pub sat_data: Option<(u32, u32)>,
}

impl Classification {
    /// Whether `location` takes part in pass 2 for any attribute it supplies
    pub fn uses(&self, location: &Location) -> bool {
        let eplev = location.effective_preference();
        (location.has_position() && self.position.admits(eplev))
            || (location.has_speed() && self.speed.admits(eplev))
            || (location.has_bearing() && self.bearing.admits(eplev))
            || (location.has_altitude() && self.altitude.admits(eplev))
    }
}

/// Gather provenance from the entries pass 2 uses
///
/// Fix type, fix time, validity and preference come from the position
/// contributors, or from every used entry when nobody supplies a position.
/// Each field takes its own maximum. Satellite counts come from the used entry
/// with the latest fix time, whatever group it contributes to; on equal times
/// the later slot wins.
pub(crate) fn provenance(raw: &[Location], class: &Classification) -> Option<Provenance> {
    let from_position = class.position.ties() > 0;
    let mut out: Option<Provenance> = None;
    let mut sat_data = None;
    let mut sat_time = NO_FIX;

    for location in raw {
        if !class.uses(location) {
            continue;
        }

        if let Some(sats) = location.sat_data() {
            if sat_data.is_none() || location.fix_time() >= sat_time {
                sat_data = Some(sats);
                sat_time = location.fix_time();
            }
        }

        let sets_metadata = !from_position
            || (location.has_position()
                && class.position.admits(location.effective_preference()));
        if !sets_metadata {
            continue;
        }
        let entry = out.get_or_insert(Provenance {
            fix_type: location.fix_type(),
            fix_time: location.fix_time(),
            validity: location.validity(),
            preference: location.preference(),
            sat_data: None,
        });
        entry.fix_type = entry.fix_type.max(location.fix_type());
        entry.fix_time = entry.fix_time.max(location.fix_time());
        entry.validity = entry.validity.max(location.validity());
        entry.preference = entry.preference.max(location.preference());
    }

    out.map(|prov| Provenance { sat_data, ..prov })
}
