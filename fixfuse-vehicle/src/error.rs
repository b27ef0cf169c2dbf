//! Error types for the vehicle runtime
//!
//! The core reports `Copy` errors with static messages. Out here errors may
//! carry owned context (paths, source names) and wrap `std::io` and
//! `serde_json` failures, so they use `thiserror` directly.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Result type for vehicle operations
pub type VehicleResult<T> = Result<T, VehicleError>;

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read configuration {}: {error}", path.display())]
    Io {
        /// File that was requested
        path: PathBuf,
        /// Underlying I/O error
        error: io::Error,
    },

    /// The JSON is malformed or has the wrong shape
    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error(transparent)]
    Invalid(#[from] fixfuse_core::ConfigError),
}

/// Vehicle runtime errors
#[derive(Error, Debug)]
pub enum VehicleError {
    /// A provider produces faster than the vehicle consumes
    #[error("Provider channel '{name}' is full (capacity {capacity})")]
    ChannelFull {
        /// Provider name
        name: String,
        /// Channel capacity
        capacity: usize,
    },

    /// The vehicle side of a provider channel is gone
    #[error("Provider channel '{name}' is disconnected")]
    Disconnected {
        /// Provider name
        name: String,
    },

    /// A raw location was rejected or the raw store is full
    #[error("Location error: {0}")]
    Location(#[from] fixfuse_core::LocationError),

    /// Configuration problem
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<fixfuse_core::ConfigError> for VehicleError {
    fn from(err: fixfuse_core::ConfigError) -> Self {
        VehicleError::Config(ConfigError::Invalid(err))
    }
}
