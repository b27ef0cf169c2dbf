//! Error Types for Location Ingestion and Extrapolation
//!
//! ## Design Philosophy
//!
//! Errors in the core follow the same rules as the rest of the engine:
//!
//! 1. **No Heap Allocation**: error data is inline, messages are `&'static str`.
//! 2. **Copy Semantics**: errors are `Copy` so they can be returned from the
//!    fusion hot path and stored without ownership concerns.
//! 3. **Never Fatal**: nothing in the core aborts. Numeric degeneracies inside a
//!    fusion pass are not errors at all; they are logged and the affected
//!    attribute keeps its previous value.
//!
//! ## Error Categories
//!
//! ### Ingestion (`LocationError`)
//! - `InvalidPosition`: coordinates that are NaN, infinite or off the globe
//! - `InvalidAccuracy`: negative or non-finite accuracy radius
//! - `InvalidValue`: any other present field that is not a finite number
//! - `StoreFull` / `UnknownSlot`: raw store bookkeeping
//!
//! ### Dead Reckoning (`ExtrapolationError`)
//! - `NoPriorFix`: the location has never had a fix, so elapsed time is unknown
//! - `NoRoute` / `NoStreetGeometry`: there is nothing to drive along
//!
//! In every extrapolation failure case the caller keeps its last known location.
//!
//! ```rust
//! use fixfuse_core::{Extrapolator, ExtrapolationError, Location};
//!
//! let extrapolator = Extrapolator::default();
//! let mut location = Location::new();
//! match extrapolator.extrapolate(&mut location, None, None, 1_000) {
//!     Err(ExtrapolationError::NoPriorFix) => { /* keep showing the old position */ }
//!     _ => {}
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for location ingestion
pub type LocationResult<T> = Result<T, LocationError>;

/// Result type for extrapolation
pub type ExtrapolationResult<T> = Result<T, ExtrapolationError>;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Raw location ingestion errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LocationError {
    /// Coordinates are not a point on the globe
    #[error("Position ({lat}, {lng}) is not a valid coordinate")]
    InvalidPosition {
        /// Latitude as reported
        lat: f64,
        /// Longitude as reported
        lng: f64,
    },

    /// Accuracy radius is negative or not a number
    #[error("Accuracy radius {radius} m is not a finite, non-negative distance")]
    InvalidAccuracy {
        /// Radius as reported
        radius: f64,
    },

    /// A present field holds NaN or infinity
    #[error("Invalid value for {field}: not a valid number")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
    },

    /// All raw slots are taken
    #[error("Raw location store full: capacity {capacity}")]
    StoreFull {
        /// Maximum number of slots
        capacity: usize,
    },

    /// Slot id does not belong to this store
    #[error("Unknown raw location slot {slot}")]
    UnknownSlot {
        /// Index that was requested
        slot: usize,
    },
}

/// Dead-reckoning failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtrapolationError {
    /// The location carries the zero fix-time sentinel
    #[error("No previous fix to extrapolate from")]
    NoPriorFix,

    /// No route is active
    #[error("No active route")]
    NoRoute,

    /// The route has no street item with at least two points
    #[error("Route has no walkable street geometry")]
    NoStreetGeometry,
}

/// Configuration value rejected by `validate()`
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A parameter is outside its permitted range
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in configuration files
        name: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}
