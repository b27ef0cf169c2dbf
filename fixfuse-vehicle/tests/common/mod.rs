//! Shared fixtures for vehicle integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use fixfuse_core::{GeoPoint, Location, PositionAttribute, Route, StreetType, Timestamp};

/// Start of simulated time
pub const T0: Timestamp = 1_700_000_000_000;

/// Start of the demo drive
pub const HOME: GeoPoint = GeoPoint::new(48.137, 11.575);
/// About 745 m east of `HOME`
pub const EAST: GeoPoint = GeoPoint::new(48.137, 11.585);

/// Single street from `HOME` to `EAST`
pub fn east_route() -> Route {
    Route::new().with_street(StreetType::Street2City, Some(50.0), &[HOME, EAST])
}

/// Listener that remembers every callback
#[derive(Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<(PositionAttribute, Location)>>>,
}

impl Recorder {
    pub fn listener(&self) -> impl FnMut(PositionAttribute, &Location) + Send + 'static {
        let seen = Arc::clone(&self.seen);
        move |attribute, location: &Location| {
            seen.lock().unwrap().push((attribute, *location));
        }
    }

    pub fn attributes(&self) -> Vec<PositionAttribute> {
        self.seen.lock().unwrap().iter().map(|(a, _)| *a).collect()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap().clear();
    }
}
