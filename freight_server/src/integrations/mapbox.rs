//! Plugs the Mapbox client into the marketplace workflows.
use freight_common::{Coordinate, RouteOption};
use freight_engine::traits::Geocoder;
use log::*;
use mapbox_tools::{MapboxApi, MapboxConfig};

use crate::errors::ServerError;

/// A [`Geocoder`] backed by the Mapbox geocoding and directions APIs.
#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    api: MapboxApi,
}

impl MapboxGeocoder {
    pub fn new(config: MapboxConfig) -> Result<Self, ServerError> {
        if config.access_token.is_empty() {
            warn!("🌍️ No Mapbox access token is configured. Orders cannot be created until one is set.");
        }
        let api = MapboxApi::new(config).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { api })
    }
}

impl Geocoder for MapboxGeocoder {
    async fn resolve_address(&self, address: &str) -> Option<Coordinate> {
        self.api.resolve_address(address).await
    }

    async fn fetch_routes(&self, start: Coordinate, end: Coordinate) -> Option<Vec<RouteOption>> {
        self.api.fetch_routes(start, end).await
    }
}
