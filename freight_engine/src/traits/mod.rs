//! # Storage and collaborator interfaces
//!
//! This module defines the contracts that the marketplace workflows are written against. The workflows in
//! [`crate::fe_api`] are generic over these traits, so a backend (SQLite today) or an external service (Mapbox today)
//! can be swapped for a test double without touching the workflow logic.
//!
//! ## Traits
//! * [`AccountManagement`] registers accounts and looks up accounts and their role profiles.
//! * [`WarehouseManagement`] maintains the virtual warehouse and its stock lines.
//! * [`MarketplaceDatabase`] is the top-level backend trait: item catalogues, categories, cargo and transport orders,
//!   shipment contracts and CMR records.
//! * [`Geocoder`] turns address text into coordinates and fetches driving routes. It is best-effort: failures are
//!   reported as `None`, never as errors.
mod account_management;
mod data_objects;
mod geocoder;
mod marketplace_database;
mod warehouse_management;

pub use account_management::{AccountApiError, AccountManagement};
pub use data_objects::{ProfileCoordinates, ValidationError};
pub use geocoder::Geocoder;
pub use marketplace_database::{MarketplaceDatabase, MarketplaceError};
pub use warehouse_management::WarehouseManagement;
