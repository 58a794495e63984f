use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    db_types::{
        CargoItem,
        CargoOrder,
        Category,
        CategoryKind,
        CmrDocument,
        ContractNumber,
        NewCargoItem,
        NewCargoOrder,
        NewContract,
        NewTransportItem,
        NewTransportOrder,
        Role,
        ShipmentContract,
        TransportItem,
        TransportOrder,
    },
    order_objects::{CargoOrderQuery, TransportOrderQuery},
    traits::{AccountApiError, AccountManagement, ValidationError, WarehouseManagement},
};

#[derive(Debug, Clone, Error)]
pub enum MarketplaceError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("{0}")]
    AccountError(#[from] AccountApiError),
    #[error("{0}")]
    Validation(ValidationError),
    #[error("Account {account_id} has no {role} profile")]
    ProfileNotFound { account_id: i64, role: Role },
    #[error("The requested cargo item {0} does not exist")]
    CargoItemNotFound(i64),
    #[error("The requested cargo order {0} does not exist")]
    CargoOrderNotFound(i64),
    #[error("The requested transport order {0} does not exist")]
    TransportOrderNotFound(i64),
    #[error("The requested contract {0} does not exist")]
    ContractNotFound(String),
    #[error("Shipper {0} does not have a virtual warehouse")]
    WarehouseNotFound(i64),
    #[error("Selected transport unit is already in a contract.")]
    TransportOrderAlreadyContracted(i64),
    #[error("Selected cargo order is already in a contract.")]
    CargoOrderAlreadyContracted(i64),
    #[error("Contract number {0} has already been issued")]
    ContractNumberCollision(String),
    #[error("A record with this value already exists. {0}")]
    DuplicateEntry(String),
    #[error("Forbidden. {0}")]
    Forbidden(String),
}

impl From<sqlx::Error> for MarketplaceError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                MarketplaceError::DuplicateEntry(db_err.message().to_string())
            },
            e => MarketplaceError::DatabaseError(e.to_string()),
        }
    }
}

impl From<ValidationError> for MarketplaceError {
    fn from(e: ValidationError) -> Self {
        MarketplaceError::Validation(e)
    }
}

/// This trait defines the highest level of behaviour for backends supporting the freight marketplace.
///
/// Accounts and warehouses are covered by the [`AccountManagement`] and [`WarehouseManagement`] supertraits. This
/// trait adds the catalogues, orders, contracts and CMR records.
///
/// Ownership rules (a cargo item belongs to the shipper that submits it, for example) are enforced by the workflow
/// APIs in [`crate::fe_api`]. Backends enforce the storage invariants: uniqueness, foreign keys, and the atomicity of
/// multi-row writes.
#[allow(async_fn_in_trait)]
pub trait MarketplaceDatabase: Clone + AccountManagement + WarehouseManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    //--------------------------------------   Item catalogues   -----------------------------------------------------
    async fn insert_cargo_item(&self, shipper_id: i64, item: NewCargoItem) -> Result<CargoItem, MarketplaceError>;

    async fn fetch_cargo_items_for_shipper(&self, shipper_id: i64) -> Result<Vec<CargoItem>, MarketplaceError>;

    /// Fetches the cargo items with the given ids. Unknown ids are silently skipped.
    async fn fetch_cargo_items(&self, ids: &[i64]) -> Result<Vec<CargoItem>, MarketplaceError>;

    /// Inserts a transport item. A duplicate driver licence, truck number or trailer number is reported as a
    /// [`MarketplaceError::Validation`] naming the column.
    async fn insert_transport_item(
        &self,
        carrier_id: i64,
        item: NewTransportItem,
    ) -> Result<TransportItem, MarketplaceError>;

    async fn fetch_transport_items_for_carrier(&self, carrier_id: i64) -> Result<Vec<TransportItem>, MarketplaceError>;

    /// Fetches the transport items with the given ids. Unknown ids are silently skipped.
    async fn fetch_transport_items(&self, ids: &[i64]) -> Result<Vec<TransportItem>, MarketplaceError>;

    async fn insert_category(
        &self,
        kind: CategoryKind,
        name: &str,
        description: Option<String>,
    ) -> Result<Category, MarketplaceError>;

    /// All categories of the given kind, ordered by name.
    async fn fetch_categories(&self, kind: CategoryKind) -> Result<Vec<Category>, MarketplaceError>;

    /// Fetches the categories of the given kind with the given ids. Unknown ids are silently skipped.
    async fn fetch_categories_by_id(&self, kind: CategoryKind, ids: &[i64]) -> Result<Vec<Category>, MarketplaceError>;

    //--------------------------------------       Orders       -----------------------------------------------------
    /// Stores the order together with its item and category links in a single transaction.
    async fn insert_cargo_order(&self, order: NewCargoOrder) -> Result<CargoOrder, MarketplaceError>;

    async fn fetch_cargo_order(&self, id: i64) -> Result<Option<CargoOrder>, MarketplaceError>;

    /// Cargo orders matching the query, newest first. Each order appears once.
    async fn search_cargo_orders(&self, query: CargoOrderQuery) -> Result<Vec<CargoOrder>, MarketplaceError>;

    async fn count_cargo_orders_for_shipper(&self, shipper_id: i64) -> Result<i64, MarketplaceError>;

    /// Stores the order together with its item and category links in a single transaction.
    async fn insert_transport_order(&self, order: NewTransportOrder) -> Result<TransportOrder, MarketplaceError>;

    async fn fetch_transport_order(&self, id: i64) -> Result<Option<TransportOrder>, MarketplaceError>;

    /// Transport orders matching the query, newest first. Each order appears once.
    async fn search_transport_orders(&self, query: TransportOrderQuery)
        -> Result<Vec<TransportOrder>, MarketplaceError>;

    async fn count_transport_orders_for_carrier(&self, carrier_id: i64) -> Result<i64, MarketplaceError>;

    //--------------------------------------     Contracts      -----------------------------------------------------
    /// Atomically claims both orders for a new contract, and marks the cargo order as accepted by the transport
    /// order's carrier.
    ///
    /// The storage layer guarantees that an order is never part of more than one contract. A claim on an order that
    /// already has a contract fails with [`MarketplaceError::TransportOrderAlreadyContracted`] or
    /// [`MarketplaceError::CargoOrderAlreadyContracted`]. A repeated contract number fails with
    /// [`MarketplaceError::ContractNumberCollision`]. Nothing is written on failure.
    async fn insert_contract(&self, contract: NewContract) -> Result<ShipmentContract, MarketplaceError>;

    async fn fetch_contract(&self, id: i64) -> Result<Option<ShipmentContract>, MarketplaceError>;

    async fn fetch_contract_by_number(
        &self,
        number: &ContractNumber,
    ) -> Result<Option<ShipmentContract>, MarketplaceError>;

    /// Contracts whose transport order belongs to the carrier, newest first.
    async fn fetch_contracts_for_carrier(&self, carrier_id: i64) -> Result<Vec<ShipmentContract>, MarketplaceError>;

    /// Contracts whose cargo order belongs to the shipper, newest first.
    async fn fetch_contracts_for_shipper(&self, shipper_id: i64) -> Result<Vec<ShipmentContract>, MarketplaceError>;

    //--------------------------------------   CMR documents    -----------------------------------------------------
    async fn insert_cmr_document(
        &self,
        contract_id: i64,
        file_path: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<CmrDocument, MarketplaceError>;

    /// The CMR documents for a contract, newest first.
    async fn fetch_cmr_documents(&self, contract_id: i64) -> Result<Vec<CmrDocument>, MarketplaceError>;
}
