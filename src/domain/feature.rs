use geo::{LineString, MultiPolygon, Point, Polygon};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// City boundary as returned by the geocoder. Single polygons are wrapped.
pub type Boundary = MultiPolygon<f64>;

/// WGS84 latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// geo uses x = lon, y = lat
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    pub fn from_point(point: Point<f64>) -> Self {
        Self {
            lat: point.y(),
            lon: point.x(),
        }
    }
}

/// Single key=value tag selecting the facility type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Default for TagFilter {
    fn default() -> Self {
        Self::new("leisure", "marina")
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Geometry of a matched OSM element
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Point(Point<f64>),
    Polygon(Polygon<f64>),
    LineString(LineString<f64>),
    MultiPolygon(MultiPolygon<f64>),
    /// Element came back without usable geometry
    Unknown,
}

/// One facility matching the tag filter
#[derive(Debug, Clone)]
pub struct Feature {
    pub osm_type: String,
    pub osm_id: u64,
    pub tags: HashMap<String, String>,
    pub geometry: FeatureGeometry,
}

impl Feature {
    pub fn new(geometry: FeatureGeometry) -> Self {
        Self {
            osm_type: String::new(),
            osm_id: 0,
            tags: HashMap::new(),
            geometry,
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}
