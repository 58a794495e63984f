use freight_common::{Coordinate, Point, RouteOption};
use serde::{Deserialize, Serialize};

/// Average truck speed used for travel time estimates, km/h
pub const AVERAGE_SPEED_KMH: f64 = 85.0;
/// Litres per km
pub const FUEL_CONSUMPTION: f64 = 0.3;
/// Price per litre
pub const FUEL_PRICE: f64 = 1.6;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Display-only estimates for a route. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub distance_km: f64,
    pub travel_time_minutes: f64,
    pub fuel_cost: f64,
}

impl RouteEstimate {
    pub fn for_distance(distance_km: f64) -> Self {
        Self {
            distance_km,
            travel_time_minutes: round2(distance_km / AVERAGE_SPEED_KMH * 60.0),
            fuel_cost: round2(distance_km * FUEL_CONSUMPTION * FUEL_PRICE),
        }
    }

    /// Estimates based on the first route alternative. No route counts as a distance of zero.
    pub fn for_routes(routes: Option<&[RouteOption]>) -> Self {
        let distance = routes.and_then(|r| r.first()).map(|r| r.distance).unwrap_or_default();
        Self::for_distance(distance)
    }
}

/// A cargo order's route, as shown on the order's route page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoOrderRoute {
    pub order_id: i64,
    pub loading_points: Vec<Point>,
    pub unloading_points: Vec<Point>,
    pub route_info: Option<Vec<RouteOption>>,
    pub estimate: RouteEstimate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePreviewRequest {
    pub start_address: String,
    pub end_address: String,
}

/// An ad-hoc route lookup. Any part that could not be resolved is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePreview {
    pub start: Option<Coordinate>,
    pub end: Option<Coordinate>,
    pub routes: Option<Vec<RouteOption>>,
}

#[cfg(test)]
mod test {
    use serde_json::Value;

    use super::*;

    #[test]
    fn estimates_for_100km() {
        let estimate = RouteEstimate::for_distance(100.0);
        assert_eq!(estimate.travel_time_minutes, 70.59);
        assert_eq!(estimate.fuel_cost, 48.0);
    }

    #[test]
    fn first_route_is_used() {
        let routes = vec![
            RouteOption { distance: 262.5, duration: 180.0, geometry: Value::Null },
            RouteOption { distance: 500.0, duration: 300.0, geometry: Value::Null },
        ];
        let estimate = RouteEstimate::for_routes(Some(&routes));
        assert_eq!(estimate.distance_km, 262.5);
        assert_eq!(estimate.travel_time_minutes, 185.29);
        assert_eq!(estimate.fuel_cost, 126.0);
    }

    #[test]
    fn missing_route_is_zero() {
        let estimate = RouteEstimate::for_routes(None);
        assert_eq!(estimate, RouteEstimate { distance_km: 0.0, travel_time_minutes: 0.0, fuel_cost: 0.0 });
        assert_eq!(RouteEstimate::for_routes(Some(&[])).distance_km, 0.0);
    }
}
