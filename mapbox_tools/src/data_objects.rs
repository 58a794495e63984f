use freight_common::{Coordinate, RouteOption};
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    helpers::{meters_to_km, seconds_to_minutes},
    MapboxApiError,
};

//--------------------------------------      Geocoding      ---------------------------------------------------------
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub features: Vec<GeocodingFeature>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocodingFeature {
    #[serde(default)]
    pub place_name: Option<String>,
    pub geometry: FeatureGeometry,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureGeometry {
    pub coordinates: Vec<f64>,
}

impl GeocodingResponse {
    /// The `[longitude, latitude]` of the first feature, or `None` when nothing matched.
    pub fn first_coordinate(&self) -> Result<Option<Coordinate>, MapboxApiError> {
        let Some(feature) = self.features.first() else {
            return Ok(None);
        };
        match feature.geometry.coordinates.as_slice() {
            [lon, lat, ..] => Ok(Some(Coordinate::new(*lon, *lat))),
            other => Err(MapboxApiError::MalformedResponse(format!(
                "Expected a [longitude, latitude] pair, but got {} values",
                other.len()
            ))),
        }
    }
}

//--------------------------------------     Directions      ---------------------------------------------------------
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
    #[serde(default)]
    pub geometry: Value,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteLeg {
    /// metres
    pub distance: f64,
    /// seconds
    pub duration: f64,
}

impl DirectionsResponse {
    /// Converts each route alternative into a [`RouteOption`] using the first leg's distance and duration.
    pub fn into_route_options(self) -> Vec<RouteOption> {
        self.routes
            .into_iter()
            .enumerate()
            .filter_map(|(i, route)| match route.legs.first() {
                Some(leg) => Some(RouteOption {
                    distance: meters_to_km(leg.distance),
                    duration: seconds_to_minutes(leg.duration),
                    geometry: route.geometry,
                }),
                None => {
                    warn!("🌍️ Route alternative #{i} has no legs. Skipping it.");
                    None
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn first_feature_wins() {
        let response: GeocodingResponse = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"place_name": "Hamburg, Germany", "geometry": {"type": "Point", "coordinates": [9.99, 53.55]}},
                {"place_name": "Hamburg, New York", "geometry": {"type": "Point", "coordinates": [-78.83, 42.71]}}
            ]
        }))
        .unwrap();
        assert_eq!(response.first_coordinate().unwrap(), Some(Coordinate::new(9.99, 53.55)));
    }

    #[test]
    fn no_features_is_not_an_error() {
        let response: GeocodingResponse = serde_json::from_value(json!({"features": []})).unwrap();
        assert_eq!(response.first_coordinate().unwrap(), None);
    }

    #[test]
    fn short_coordinates_are_malformed() {
        let response: GeocodingResponse =
            serde_json::from_value(json!({"features": [{"geometry": {"coordinates": [9.99]}}]})).unwrap();
        assert!(matches!(response.first_coordinate(), Err(MapboxApiError::MalformedResponse(_))));
    }

    #[test]
    fn routes_are_converted_to_km_and_minutes() {
        let geometry = json!({"type": "LineString", "coordinates": [[24.1, 56.9], [25.3, 54.7]]});
        let response: DirectionsResponse = serde_json::from_value(json!({
            "code": "Ok",
            "routes": [
                {"legs": [{"distance": 262_500.0, "duration": 10_800.0}], "geometry": geometry.clone()},
                {"legs": [], "geometry": null},
                {"legs": [{"distance": 280_000.0, "duration": 11_700.0}], "geometry": geometry.clone()}
            ]
        }))
        .unwrap();
        let routes = response.into_route_options();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].distance, 262.5);
        assert_eq!(routes[0].duration, 180.0);
        assert_eq!(routes[0].geometry, geometry);
        assert_eq!(routes[1].distance, 280.0);
        assert_eq!(routes[1].duration, 195.0);
    }
}
