use std::{sync::Arc, time::Duration};

use freight_common::{Coordinate, RouteOption};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::de::DeserializeOwned;

use crate::{
    config::MapboxConfig,
    data_objects::{DirectionsResponse, GeocodingResponse},
    helpers::{directions_path, geocoding_path},
    MapboxApiError,
};

#[derive(Clone)]
pub struct MapboxApi {
    config: MapboxConfig,
    client: Arc<Client>,
}

impl std::fmt::Debug for MapboxApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MapboxApi ({})", self.config.api_url)
    }
}

impl MapboxApi {
    pub fn new(config: MapboxConfig) -> Result<Self, MapboxApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| MapboxApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &MapboxConfig {
        &self.config
    }

    /// Issues an authenticated GET request against the Mapbox API. The access token is appended to `params`.
    pub async fn rest_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<T, MapboxApiError> {
        let url = self.url(path);
        // The token is a query parameter, so log the path rather than the full url
        trace!("🌍️ Sending REST query: {path}");
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("access_token", self.config.access_token.reveal().as_str())])
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MapboxApiError::Timeout(timeout.as_secs())
                } else if e.is_builder() {
                    MapboxApiError::RestRequestError(e.to_string())
                } else {
                    MapboxApiError::RestResponseError(e.to_string())
                }
            })?;
        if response.status().is_success() {
            trace!("🌍️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| MapboxApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| MapboxApiError::RestResponseError(e.to_string()))?;
            Err(MapboxApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url.trim_end_matches('/'))
    }

    /// Forward-geocodes `address`. `Ok(None)` means the geocoder found no match.
    pub async fn try_resolve_address(&self, address: &str) -> Result<Option<Coordinate>, MapboxApiError> {
        let path = geocoding_path(address);
        let params = [("limit", "1"), ("language", "en")];
        let response =
            self.rest_query::<GeocodingResponse>(&path, &params, self.config.geocode_timeout).await?;
        response.first_coordinate()
    }

    /// Best-effort address lookup. Any failure is logged and reported as `None`.
    pub async fn resolve_address(&self, address: &str) -> Option<Coordinate> {
        match self.try_resolve_address(address).await {
            Ok(Some(coordinate)) => {
                debug!("🌍️ Resolved '{address}' to [{coordinate}]");
                Some(coordinate)
            },
            Ok(None) => {
                info!("🌍️ No geocoding match for '{address}'");
                None
            },
            Err(e) => {
                warn!("🌍️ Could not resolve '{address}'. {e}");
                None
            },
        }
    }

    /// Fetches the driving route alternatives between two points.
    pub async fn try_fetch_routes(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Vec<RouteOption>, MapboxApiError> {
        let path = directions_path(start, end);
        let params =
            [("alternatives", "true"), ("annotations", "distance,duration"), ("geometries", "geojson")];
        let response = self.rest_query::<DirectionsResponse>(&path, &params, self.config.route_timeout).await?;
        Ok(response.into_route_options())
    }

    /// Best-effort route lookup. Any failure is logged and reported as `None`.
    pub async fn fetch_routes(&self, start: Coordinate, end: Coordinate) -> Option<Vec<RouteOption>> {
        match self.try_fetch_routes(start, end).await {
            Ok(routes) => {
                debug!("🌍️ Fetched {} route alternatives from [{start}] to [{end}]", routes.len());
                Some(routes)
            },
            Err(e) => {
                warn!("🌍️ Could not fetch routes from [{start}] to [{end}]. {e}");
                None
            },
        }
    }
}
