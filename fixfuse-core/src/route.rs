//! Route and speed-profile seams
//!
//! The extrapolator never computes routes; it only walks one. Routing engines
//! expose their result through [`RoutePath`], an indexed, read-only view of
//! route items with their polylines. Speeds come from a [`SpeedProfile`] that
//! maps a street type to a profile speed and a policy for posted limits.
//!
//! [`Route`] is a simple owned implementation, enough for simulation, replay
//! and tests.

use alloc::vec::Vec;

use crate::geo::GeoPoint;

/// Road classification of a street item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StreetType {
    /// Unclassified small street
    #[cfg_attr(feature = "serde", serde(rename = "street_0"))]
    Street0,
    /// Smallest city street
    #[cfg_attr(feature = "serde", serde(rename = "street_1_city"))]
    Street1City,
    /// City street, class 2
    #[cfg_attr(feature = "serde", serde(rename = "street_2_city"))]
    Street2City,
    /// City street, class 3
    #[cfg_attr(feature = "serde", serde(rename = "street_3_city"))]
    Street3City,
    /// Main city street
    #[cfg_attr(feature = "serde", serde(rename = "street_4_city"))]
    Street4City,
    /// City highway
    HighwayCity,
    /// Smallest country road
    #[cfg_attr(feature = "serde", serde(rename = "street_1_land"))]
    Street1Land,
    /// Country road, class 2
    #[cfg_attr(feature = "serde", serde(rename = "street_2_land"))]
    Street2Land,
    /// Country road, class 3
    #[cfg_attr(feature = "serde", serde(rename = "street_3_land"))]
    Street3Land,
    /// Main country road
    #[cfg_attr(feature = "serde", serde(rename = "street_4_land"))]
    Street4Land,
    /// Multi-lane road
    StreetNLanes,
    /// Highway
    HighwayLand,
    /// Highway ramp
    Ramp,
    /// Roundabout
    Roundabout,
    /// Service road
    Service,
    /// Living street
    LivingStreet,
    /// Ferry route
    Ferry,
}

/// What a route item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RouteItemKind {
    /// Marker connecting the vehicle to the road network
    RouteStart,
    /// Drivable street segment
    Street,
    /// Anything else the routing engine emits (waypoints, annotations)
    Other,
}

/// Borrowed view of one route item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteItem<'a> {
    /// What the item represents
    pub kind: RouteItemKind,
    /// Only meaningful for `Street` items
    pub street_type: Option<StreetType>,
    /// Posted maximum speed, km/h
    pub max_speed_kmh: Option<f64>,
    /// Polyline in travel direction
    pub points: &'a [GeoPoint],
}

impl RouteItem<'_> {
    /// A street with at least one segment
    pub fn is_walkable(&self) -> bool {
        self.kind == RouteItemKind::Street && self.points.len() >= 2
    }
}

/// Read-only, ordered access to the items of a computed route
pub trait RoutePath {
    /// Number of items
    fn len(&self) -> usize;

    /// Item at `index`, `None` past the end
    fn item(&self, index: usize) -> Option<RouteItem<'_>>;

    /// Whether the route has no items
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct OwnedItem {
    kind: RouteItemKind,
    street_type: Option<StreetType>,
    max_speed_kmh: Option<f64>,
    points: Vec<GeoPoint>,
}

/// Owned route
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    items: Vec<OwnedItem>,
}

impl Route {
    /// Empty route
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route-start marker
    pub fn with_start(mut self, points: &[GeoPoint]) -> Self {
        self.items.push(OwnedItem {
            kind: RouteItemKind::RouteStart,
            street_type: None,
            max_speed_kmh: None,
            points: points.to_vec(),
        });
        self
    }

    /// Append a street segment
    pub fn with_street(
        mut self,
        street_type: StreetType,
        max_speed_kmh: Option<f64>,
        points: &[GeoPoint],
    ) -> Self {
        self.push_street(street_type, max_speed_kmh, points);
        self
    }

    /// Append a non-street item
    pub fn with_other(mut self, points: &[GeoPoint]) -> Self {
        self.items.push(OwnedItem {
            kind: RouteItemKind::Other,
            street_type: None,
            max_speed_kmh: None,
            points: points.to_vec(),
        });
        self
    }

    /// Append a street item
    pub fn push_street(
        &mut self,
        street_type: StreetType,
        max_speed_kmh: Option<f64>,
        points: &[GeoPoint],
    ) {
        self.items.push(OwnedItem {
            kind: RouteItemKind::Street,
            street_type: Some(street_type),
            max_speed_kmh,
            points: points.to_vec(),
        });
    }

    /// Last point of the last walkable street
    pub fn destination(&self) -> Option<GeoPoint> {
        (0..self.len())
            .rev()
            .filter_map(|i| self.item(i))
            .find(|item| item.is_walkable())
            .and_then(|item| item.points.last().copied())
    }
}

impl RoutePath for Route {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn item(&self, index: usize) -> Option<RouteItem<'_>> {
        self.items.get(index).map(|item| RouteItem {
            kind: item.kind,
            street_type: item.street_type,
            max_speed_kmh: item.max_speed_kmh,
            points: &item.points,
        })
    }
}

/// How a posted maximum speed combines with the profile speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MaxspeedHandling {
    /// Use the posted maximum whenever there is one
    Enforce,
    /// Use whichever is lower
    #[default]
    PreferLower,
    /// Always use the profile speed
    Ignore,
}

/// Speed settings for one street type
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadProfile {
    /// Travel speed on this street type, km/h
    pub speed_kmh: f64,
    /// How posted limits combine with `speed_kmh`
    #[cfg_attr(feature = "serde", serde(default))]
    pub maxspeed_handling: MaxspeedHandling,
}

impl RoadProfile {
    /// Profile driving `speed_kmh`
    pub const fn new(speed_kmh: f64, maxspeed_handling: MaxspeedHandling) -> Self {
        Self {
            speed_kmh,
            maxspeed_handling,
        }
    }

    /// Speed to drive on a segment with the given posted limit
    ///
    /// Returns `None` when neither source yields a positive speed.
    pub fn resolve(&self, posted_kmh: Option<f64>) -> Option<f64> {
        let profile = usable(Some(self.speed_kmh));
        let posted = usable(posted_kmh);

        match (self.maxspeed_handling, profile, posted) {
            (MaxspeedHandling::Ignore, Some(p), _) => Some(p),
            (MaxspeedHandling::Enforce, _, Some(m)) => Some(m),
            (MaxspeedHandling::PreferLower, Some(p), Some(m)) => Some(p.min(m)),
            (_, p, m) => p.or(m),
        }
    }
}

fn usable(speed: Option<f64>) -> Option<f64> {
    speed.filter(|s| s.is_finite() && *s > 0.0)
}

/// Street type → road profile lookup
pub trait SpeedProfile {
    /// Profile for `street_type`, if the vehicle uses that road class
    fn road_profile(&self, street_type: StreetType) -> Option<RoadProfile>;
}

impl<F> SpeedProfile for F
where
    F: Fn(StreetType) -> Option<RoadProfile>,
{
    fn road_profile(&self, street_type: StreetType) -> Option<RoadProfile> {
        self(street_type)
    }
}
