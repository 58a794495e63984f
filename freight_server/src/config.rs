use std::env;

use freight_common::parse_boolean_flag;
use log::*;
use mapbox_tools::MapboxConfig;

const DEFAULT_FMS_HOST: &str = "127.0.0.1";
const DEFAULT_FMS_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/freight_match.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// If true, pending database migrations are applied at startup.
    pub run_migrations: bool,
    /// Geocoding and routing configuration
    pub mapbox: MapboxConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FMS_HOST.to_string(),
            port: DEFAULT_FMS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            run_migrations: true,
            mapbox: MapboxConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("FMS_HOST").ok().unwrap_or_else(|| DEFAULT_FMS_HOST.into());
        let port = env::var("FMS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for FMS_PORT. {e} Using the default, {DEFAULT_FMS_PORT}, instead."
                    );
                    DEFAULT_FMS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_FMS_PORT);
        let database_url = env::var("FMS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ FMS_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = env::var("FMS_DB_MAX_CONNECTIONS")
            .map(|s| {
                s.parse::<u32>().ok().filter(|n| *n > 0).unwrap_or_else(|| {
                    error!(
                        "🪛️ {s} is not a valid value for FMS_DB_MAX_CONNECTIONS. Using the default, \
                         {DEFAULT_MAX_CONNECTIONS}, instead."
                    );
                    DEFAULT_MAX_CONNECTIONS
                })
            })
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let run_migrations = parse_boolean_flag(env::var("FMS_RUN_MIGRATIONS").ok(), true);
        let mapbox = MapboxConfig::new_from_env_or_default();
        Self { host, port, database_url, max_connections, run_migrations, mapbox }
    }
}
