//! Core location fusion engine for fixfuse
//!
//! Merges location reports from several independently updating sources into one
//! authoritative vehicle location and, when no fresh fix is available, estimates
//! where the vehicle is by dead-reckoning along the active route.
//!
//! Key constraints:
//! - A fusion pass is synchronous and never blocks or allocates
//! - Up to 16 raw sources per vehicle (typically 1-10)
//! - Degenerate inputs never abort a pass; the affected attribute stays unchanged
//!
//! ```no_run
//! use fixfuse_core::{FusionEngine, GeoPoint, Location, Preference, RawLocationStore, Validity};
//!
//! let engine = FusionEngine::default();
//! let mut store = RawLocationStore::new();
//! let gps = store.register(Preference::High).unwrap();
//!
//! let mut fix = Location::new();
//! fix.set_position(GeoPoint::new(48.137, 11.575));
//! fix.set_accuracy(5.0);
//! fix.set_validity(Validity::Valid);
//! fix.set_fix_time(1_700_000_000_000);
//! store.update(gps, fix).unwrap();
//!
//! let mut fused = Location::new();
//! let changes = engine.fuse(store.as_slice(), &mut fused);
//! for attribute in engine.notifications(&changes) {
//!     // forward to listeners
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod constants;
pub mod errors;
pub mod extrapolate;
pub mod fusion;
pub mod geo;
pub mod location;
pub mod notify;
pub mod preference;
pub mod route;
pub mod store;
pub mod time;

// Public API
pub use errors::{
    ConfigError, ConfigResult, ExtrapolationError, ExtrapolationResult, LocationError,
    LocationResult,
};
pub use extrapolate::{ExtrapolationOutcome, Extrapolator, ExtrapolatorConfig};
pub use fusion::{FusionConfig, FusionEngine};
pub use geo::GeoPoint;
pub use location::{Location, Preference, PresenceFlags, Validity};
pub use notify::{AttributeListener, ChangeSet, Notifications, PositionAttribute};
pub use preference::{effective_preference, EffectivePreference};
pub use route::{
    MaxspeedHandling, RoadProfile, Route, RouteItem, RouteItemKind, RoutePath, SpeedProfile,
    StreetType,
};
pub use store::{RawLocationStore, SlotId};
pub use time::{TimeSource, Timestamp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
