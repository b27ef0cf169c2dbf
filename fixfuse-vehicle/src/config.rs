//! Vehicle configuration
//!
//! Loaded from JSON; every field has a default so a config file only needs to
//! name what it changes:
//!
//! ```json
//! {
//!   "name": "demo",
//!   "interval_ms": 500,
//!   "fusion": { "notify_motion": true },
//!   "demo": { "speed_kmh": 40.0, "start": { "lat": 48.137, "lng": 11.575 } }
//! }
//! ```

use std::{fs, path::Path};

use fixfuse_core::{
    constants::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_TICK_INTERVAL_MS, SIMULATED_ACCURACY_M},
    ConfigError as CoreConfigError, ExtrapolatorConfig, FusionConfig, GeoPoint,
};
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, profile::VehicleProfile};

/// Settings of the simulated (demo) source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Driving speed in km/h; 0 derives it from the road network
    pub speed_kmh: f64,
    /// Accuracy radius reported for simulated fixes, meters
    pub accuracy_m: f64,
    /// Initial position
    pub start: Option<GeoPoint>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            speed_kmh: 0.0,
            accuracy_m: SIMULATED_ACCURACY_M,
            start: None,
        }
    }
}

impl DemoConfig {
    /// Extrapolator settings for this demo source
    pub fn extrapolator(&self) -> ExtrapolatorConfig {
        ExtrapolatorConfig {
            fixed_speed_kmh: (self.speed_kmh > 0.0).then_some(self.speed_kmh),
            simulated_accuracy_m: self.accuracy_m,
            ..ExtrapolatorConfig::default()
        }
    }

    pub fn validate(&self) -> Result<(), CoreConfigError> {
        if !self.speed_kmh.is_finite() || self.speed_kmh < 0.0 {
            return Err(CoreConfigError::InvalidParameter {
                name: "demo.speed_kmh",
                reason: "must be a finite, non-negative speed",
            });
        }
        if let Some(start) = self.start {
            if !start.is_valid() {
                return Err(CoreConfigError::InvalidParameter {
                    name: "demo.start",
                    reason: "not a valid coordinate",
                });
            }
        }
        self.extrapolator().validate()
    }
}

/// Complete vehicle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Vehicle name used in logs
    pub name: String,
    /// Period of the fusion timer, milliseconds
    pub interval_ms: u64,
    /// Capacity of each provider channel
    pub channel_capacity: usize,
    pub fusion: FusionConfig,
    /// Speed profile for dead reckoning
    pub profile: VehicleProfile,
    /// Adds a simulated source when present
    pub demo: Option<DemoConfig>,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            name: "vehicle".into(),
            interval_ms: DEFAULT_TICK_INTERVAL_MS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            fusion: FusionConfig::default(),
            profile: VehicleProfile::car(),
            demo: None,
        }
    }
}

impl VehicleConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        log::debug!("Loading vehicle configuration from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), CoreConfigError> {
        if self.interval_ms == 0 {
            return Err(CoreConfigError::InvalidParameter {
                name: "interval_ms",
                reason: "must be positive",
            });
        }
        if self.channel_capacity == 0 {
            return Err(CoreConfigError::InvalidParameter {
                name: "channel_capacity",
                reason: "must be at least 1",
            });
        }
        self.fusion.validate()?;
        for road in self.profile.roads.values() {
            if !road.speed_kmh.is_finite() || road.speed_kmh < 0.0 {
                return Err(CoreConfigError::InvalidParameter {
                    name: "profile.roads.speed_kmh",
                    reason: "must be a finite, non-negative speed",
                });
            }
        }
        if let Some(demo) = &self.demo {
            demo.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = VehicleConfig::from_json_str("{}").unwrap();
        assert_eq!(config, VehicleConfig::default());
        assert_eq!(config.interval_ms, 1000);
    }

    #[test]
    fn partial_config() {
        let config = VehicleConfig::from_json_str(
            r#"{ "name": "demo", "fusion": { "notify_motion": true }, "demo": { "speed_kmh": 40 } }"#,
        )
        .unwrap();
        assert_eq!(config.name, "demo");
        assert!(config.fusion.notify_motion);
        let demo = config.demo.unwrap();
        assert_eq!(demo.extrapolator().fixed_speed_kmh, Some(40.0));
        assert_eq!(demo.accuracy_m, SIMULATED_ACCURACY_M);
    }

    #[test]
    fn zero_demo_speed_uses_network() {
        assert_eq!(DemoConfig::default().extrapolator().fixed_speed_kmh, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            VehicleConfig::from_json_str(r#"{ "interval_ms": 0 }"#),
            Err(ConfigError::Invalid(CoreConfigError::InvalidParameter { name: "interval_ms", .. }))
        ));
        assert!(matches!(
            VehicleConfig::from_json_str(r#"{ "demo": { "speed_kmh": -3 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            VehicleConfig::from_json_str(r#"{ "interval_ms": "soon" }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
