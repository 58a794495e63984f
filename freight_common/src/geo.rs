use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

//--------------------------------------     Coordinate      ---------------------------------------------------------
/// A WGS84 position. Serialised as a `[longitude, latitude]` pair, the order used by GeoJSON and Mapbox.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self { longitude, latitude }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.longitude, c.latitude]
    }
}

/// `lon,lat`, as used in Mapbox path segments
impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)
    }
}

//--------------------------------------        Point        ---------------------------------------------------------
/// A loading or unloading point on an order. `city` holds the address text exactly as it was entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub city: String,
    pub coordinates: Coordinate,
}

impl Point {
    pub fn new<S: Into<String>>(city: S, coordinates: Coordinate) -> Self {
        Self { city: city.into(), coordinates }
    }
}

//--------------------------------------     RouteOption     ---------------------------------------------------------
/// One driving route alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOption {
    /// Route length in kilometres
    pub distance: f64,
    /// Driving time in minutes
    pub duration: f64,
    /// GeoJSON geometry, exactly as returned by the directions service
    pub geometry: Value,
}
