//! # Freight marketplace public API
//!
//! The `fe_api` module exposes the programmatic API of the marketplace. Each API wraps a storage backend (and, where
//! addresses are involved, a [`Geocoder`](crate::traits::Geocoder)) and enforces the business rules that the
//! storage layer cannot: validation, ownership and role checks, and the ordering of multi-step workflows.
//!
//! * [`accounts_api`] registers shippers and carriers and looks up accounts and profiles.
//! * [`catalogue_api`] manages cargo items, transport items and categories.
//! * [`order_flow_api`] creates, searches and displays cargo and transport orders, including address resolution and
//!   route enrichment.
//! * [`contract_api`] pairs a cargo order with a transport order into a shipment contract, and records CMR documents.
//! * [`warehouse_api`] maintains each shipper's virtual warehouse.
//!
//! # API usage
//!
//! An API instance is created by supplying a backend that implements the traits the API needs:
//!
//! ```rust,ignore
//! use freight_engine::{ContractApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = ContractApi::new(db);
//! let candidates = api.candidates(carrier_account_id).await?;
//! ```
pub mod account_objects;
pub mod accounts_api;
pub mod catalogue_api;
pub mod contract_api;
pub mod contract_objects;
pub mod order_flow_api;
pub mod order_objects;
pub mod route_objects;
pub mod warehouse_api;

mod profiles;
