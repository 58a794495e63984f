//! Thin async client for the two Mapbox endpoints the marketplace uses: forward geocoding and driving directions.
//!
//! The `try_*` methods on [`MapboxApi`] report failures as [`MapboxApiError`]. The plain methods are best-effort
//! lookups: every failure is logged and turned into `None`.
mod api;
mod config;
mod error;

mod data_objects;
pub mod helpers;

pub use api::MapboxApi;
pub use config::MapboxConfig;
pub use data_objects::{DirectionsResponse, DirectionsRoute, FeatureGeometry, GeocodingFeature, GeocodingResponse, RouteLeg};
pub use error::MapboxApiError;
