//! Effective preference
//!
//! Sources are ranked by their static [`Preference`], but a source's data is
//! worth less while it is extrapolated and worthless once it is invalid. The
//! effective preference folds validity into the ranking:
//!
//! | validity               | effective preference |
//! |------------------------|----------------------|
//! | `Invalid`              | −∞                   |
//! | `Valid`, `Static`      | preference           |
//! | `ExtrapolatedSpatial`  | preference − 1       |
//! | `ExtrapolatedTime`     | preference − 2       |
//!
//! A fresh Medium fix therefore beats a High source that is only
//! extrapolating in time.

use core::fmt;

use crate::location::{Location, Preference, Validity};

/// Preference adjusted for validity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectivePreference(i32);

impl EffectivePreference {
    /// Effective preference of invalid data; below every real level
    pub const INVALID: Self = Self(i32::MIN);

    /// Combine a preference with a validity
    pub const fn of(preference: Preference, validity: Validity) -> Self {
        let level = preference.level();
        match validity {
            Validity::Invalid => Self::INVALID,
            Validity::Valid | Validity::Static => Self(level),
            Validity::ExtrapolatedSpatial => Self(level - 1),
            Validity::ExtrapolatedTime => Self(level - 2),
        }
    }

    /// Whether this is the invalid sentinel
    pub const fn is_invalid(self) -> bool {
        self.0 == i32::MIN
    }

    /// Numeric value; `i32::MIN` for invalid data
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for EffectivePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            f.write_str("-inf")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Effective preference of a location
pub fn effective_preference(location: &Location) -> EffectivePreference {
    EffectivePreference::of(location.preference(), location.validity())
}
