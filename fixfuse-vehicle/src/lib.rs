//! Vehicle Runtime for Location Fusion
//!
//! ## Overview
//!
//! `fixfuse-core` fuses raw locations and dead-reckons along a route, but it
//! never owns threads, files or callbacks. This crate wires it into a running
//! vehicle:
//!
//! - **Sources**: platform providers (GPS, network) fed from their own
//!   threads through bounded channels, and a simulated demo source
//! - **Vehicle**: the raw store, one fused location, and the listeners
//! - **Configuration**: JSON files with defaults for every field
//! - **Profiles**: per-street-type speeds for dead reckoning
//!
//! ## Example
//!
//! ```rust
//! use fixfuse_core::{GeoPoint, Location, PositionAttribute};
//! use fixfuse_vehicle::{ProviderFix, ProviderKind, Vehicle, VehicleConfig};
//!
//! let mut vehicle = Vehicle::new(VehicleConfig::default())?;
//! let gps = vehicle.add_provider("gps", ProviderKind::Gps)?;
//! vehicle.subscribe(|attribute: PositionAttribute, location: &Location| {
//!     println!("{} -> {:?}", attribute.name(), location.position());
//! });
//!
//! // usually called from the platform's callback thread
//! gps.report_fix(ProviderFix::at(GeoPoint::new(48.137, 11.575), 0))?;
//!
//! let changes = vehicle.update(1_700_000_000_000);
//! assert!(!changes.is_empty());
//! # Ok::<(), fixfuse_vehicle::VehicleError>(())
//! ```

pub mod config;
pub mod error;
pub mod profile;
pub mod provider;
pub mod simulated;
pub mod source;
pub mod vehicle;

pub use config::{DemoConfig, VehicleConfig};
pub use error::{ConfigError, VehicleError, VehicleResult};
pub use profile::VehicleProfile;
pub use provider::{
    provider_channel, ProviderFix, ProviderHandle, ProviderKind, ProviderMessage, ProviderSource,
};
pub use simulated::SimulatedSource;
pub use source::{LocationSource, PollContext};
pub use vehicle::{format_fix_time, Vehicle};
