//! Freight Matching Engine
//!
//! The freight engine holds the marketplace where shippers publish cargo orders, carriers publish transport orders,
//! and a carrier pairs one of each into a shipment contract. It is independent of the HTTP layer and of any
//! particular geodata provider.
//!
//! The library is divided into three main sections:
//! 1. Storage ([`mod@traits`] and the SQLite backend). Backends implement [`MarketplaceDatabase`] and its supertraits.
//!    You should not need to call the backend directly. The data types it stores are defined in [`mod@db_types`] and
//!    are public.
//! 2. The public API ([`mod@fe_api`]). Each API enforces the validation, ownership and ordering rules of one
//!    workflow: registration, catalogues, order creation and search, contracts, and the virtual warehouse.
//! 3. Geodata. Workflows that need coordinates or routes take a [`Geocoder`]. The server plugs in a Mapbox client;
//!    tests use `test_utils::static_geocoder::StaticGeocoder`.
pub mod db_types;
pub mod fe_api;
pub mod helpers;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use fe_api::{
    accounts_api::AccountApi,
    catalogue_api::CatalogueApi,
    contract_api::ContractApi,
    order_flow_api::OrderFlowApi,
    order_objects,
    warehouse_api::WarehouseApi,
};
#[cfg(feature = "sqlite")]
pub use sqlite::{db as sqlite_db, SqliteDatabase};
pub use traits::{
    AccountApiError,
    AccountManagement,
    Geocoder,
    MarketplaceDatabase,
    MarketplaceError,
    ValidationError,
    WarehouseManagement,
};
