//! Vehicle speed profiles
//!
//! A profile maps street types to the speed the vehicle travels at and how
//! posted limits are applied. Profiles are plain data and can be loaded from
//! the vehicle configuration file:
//!
//! ```json
//! {
//!   "name": "bike",
//!   "roads": {
//!     "street_2_city": { "speed_kmh": 18.0 },
//!     "living_street": { "speed_kmh": 10.0, "maxspeed_handling": "ignore" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use fixfuse_core::{MaxspeedHandling, RoadProfile, SpeedProfile, StreetType};
use serde::{Deserialize, Serialize};

/// Street type → road profile table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    /// Profile name, e.g. "car"
    pub name: String,
    /// Per street type settings; missing types fall back to posted limits
    #[serde(default)]
    pub roads: BTreeMap<StreetType, RoadProfile>,
}

impl VehicleProfile {
    /// Empty profile
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roads: BTreeMap::new(),
        }
    }

    /// Builder-style insert
    pub fn with_road(mut self, street_type: StreetType, speed_kmh: f64) -> Self {
        self.roads.insert(
            street_type,
            RoadProfile::new(speed_kmh, MaxspeedHandling::PreferLower),
        );
        self
    }

    /// Default passenger car
    pub fn car() -> Self {
        use StreetType::*;

        [
            (Street0, 10.0),
            (Street1City, 10.0),
            (Street2City, 30.0),
            (Street3City, 40.0),
            (Street4City, 50.0),
            (HighwayCity, 80.0),
            (Street1Land, 60.0),
            (Street2Land, 65.0),
            (Street3Land, 70.0),
            (Street4Land, 80.0),
            (StreetNLanes, 120.0),
            (HighwayLand, 120.0),
            (Ramp, 40.0),
            (Roundabout, 10.0),
            (Service, 10.0),
            (LivingStreet, 7.0),
            (Ferry, 40.0),
        ]
        .into_iter()
        .fold(Self::new("car"), |profile, (t, speed)| profile.with_road(t, speed))
    }
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self::car()
    }
}

impl SpeedProfile for VehicleProfile {
    fn road_profile(&self, street_type: StreetType) -> Option<RoadProfile> {
        self.roads.get(&street_type).copied()
    }
}
