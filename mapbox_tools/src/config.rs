use std::time::Duration;

use freight_common::Secret;
use log::*;

pub const DEFAULT_MAPBOX_API_URL: &str = "https://api.mapbox.com";
pub const DEFAULT_ROUTE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_GEOCODE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct MapboxConfig {
    /// Scheme and host of the Mapbox API, without a trailing slash
    pub api_url: String,
    pub access_token: Secret<String>,
    /// Request timeout for the directions call
    pub route_timeout: Duration,
    /// Request timeout for each geocoding call
    pub geocode_timeout: Duration,
}

impl Default for MapboxConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_MAPBOX_API_URL.to_string(),
            access_token: Secret::default(),
            route_timeout: DEFAULT_ROUTE_TIMEOUT,
            geocode_timeout: DEFAULT_GEOCODE_TIMEOUT,
        }
    }
}

impl MapboxConfig {
    pub fn new<S: Into<String>>(api_url: S, access_token: Secret<String>) -> Self {
        Self { api_url: api_url.into(), access_token, ..Default::default() }
    }

    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("FMS_MAPBOX_API_URL").unwrap_or_else(|_| {
            info!("🪛️ FMS_MAPBOX_API_URL not set, using {DEFAULT_MAPBOX_API_URL}");
            DEFAULT_MAPBOX_API_URL.to_string()
        });
        let access_token = Secret::new(std::env::var("FMS_MAPBOX_ACCESS_TOKEN").unwrap_or_else(|_| {
            warn!(
                "🪛️ FMS_MAPBOX_ACCESS_TOKEN not set. Address lookups and routing will fail until an access token is \
                 configured."
            );
            String::default()
        }));
        let route_timeout = timeout_from_env("FMS_MAPBOX_ROUTE_TIMEOUT", DEFAULT_ROUTE_TIMEOUT);
        let geocode_timeout = timeout_from_env("FMS_MAPBOX_GEOCODE_TIMEOUT", DEFAULT_GEOCODE_TIMEOUT);
        Self { api_url, access_token, route_timeout, geocode_timeout }
    }
}

fn timeout_from_env(var: &str, default: Duration) -> Duration {
    match std::env::var(var) {
        Ok(s) => match s.parse::<u64>() {
            Ok(0) => {
                warn!("🪛️ {var} cannot be zero. Using the default of {}s.", default.as_secs());
                default
            },
            Ok(secs) => Duration::from_secs(secs),
            Err(e) => {
                error!("🪛️ {s} is not a valid value for {var}. {e} Using the default of {}s.", default.as_secs());
                default
            },
        },
        Err(_) => default,
    }
}
