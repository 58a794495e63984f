use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use freight_common::{Coordinate, RouteOption};
use serde_json::json;

use crate::traits::Geocoder;

/// A deterministic [`Geocoder`] backed by a fixed address book.
///
/// Addresses are matched case-insensitively. Routes are a single straight line whose length is set with
/// [`StaticGeocoder::with_route_km`], or no routes at all when routing is switched off. Every call is counted.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    addresses: HashMap<String, Coordinate>,
    route_km: Option<f64>,
    calls: Arc<AtomicUsize>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A geocoder that knows a handful of Baltic cities and returns a 100km route between any two of them.
    pub fn baltic() -> Self {
        Self::new()
            .with_address("Riga, Latvia", Coordinate::new(24.1052, 56.9496))
            .with_address("Vilnius, Lithuania", Coordinate::new(25.2797, 54.6872))
            .with_address("Tallinn, Estonia", Coordinate::new(24.7536, 59.4370))
            .with_address("Kaunas, Lithuania", Coordinate::new(23.9036, 54.8985))
            .with_route_km(100.0)
    }

    pub fn with_address(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.addresses.insert(address.trim().to_lowercase(), coordinate);
        self
    }

    pub fn with_route_km(mut self, km: f64) -> Self {
        self.route_km = Some(km);
        self
    }

    pub fn without_routes(mut self) -> Self {
        self.route_km = None;
        self
    }

    /// The number of geocoding and routing calls made so far, across all clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for StaticGeocoder {
    async fn resolve_address(&self, address: &str) -> Option<Coordinate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.addresses.get(&address.trim().to_lowercase()).copied()
    }

    async fn fetch_routes(&self, start: Coordinate, end: Coordinate) -> Option<Vec<RouteOption>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let km = self.route_km?;
        let geometry = json!({
            "type": "LineString",
            "coordinates": [[start.longitude, start.latitude], [end.longitude, end.latitude]]
        });
        Some(vec![RouteOption { distance: km, duration: km / 85.0 * 60.0, geometry }])
    }
}
