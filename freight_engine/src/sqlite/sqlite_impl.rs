//! `SqliteDatabase` is the concrete SQLite backend of the freight marketplace.
//!
//! It implements all the traits defined in the [`crate::traits`] module. Multi-row writes run inside a single
//! transaction; the free functions in [`super::db`] do the actual SQL.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqlitePool;

use super::db::{
    accounts,
    cargo_orders,
    categories,
    cmr,
    contracts,
    db_url,
    items,
    new_pool,
    transport_orders,
    warehouse,
};
use crate::{
    db_types::{
        Account,
        CargoItem,
        CargoOrder,
        CarrierProfile,
        Category,
        CategoryKind,
        CmrDocument,
        ContractNumber,
        NewAccount,
        NewCargoItem,
        NewCargoOrder,
        NewContract,
        NewTransportItem,
        NewTransportOrder,
        Profile,
        Role,
        ShipmentContract,
        ShipperProfile,
        TransportItem,
        TransportOrder,
        VirtualWarehouse,
        WarehouseStock,
    },
    helpers::available_quantity,
    order_objects::{CargoOrderQuery, TransportOrderQuery},
    traits::{
        AccountApiError,
        AccountManagement,
        MarketplaceDatabase,
        MarketplaceError,
        ProfileCoordinates,
        WarehouseManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl AccountManagement for SqliteDatabase {
    async fn create_account(
        &self,
        account: NewAccount,
        coordinates: ProfileCoordinates,
    ) -> Result<(Account, Profile), AccountApiError> {
        let mut tx = self.pool.begin().await?;
        let created = accounts::insert_account(&account, Utc::now(), &mut tx).await?;
        let profile = match created.role {
            Role::Shipper => {
                let warehouse_address = account.warehouse_address.as_deref();
                let profile = accounts::insert_shipper_profile(&created, warehouse_address, coordinates, &mut tx).await?;
                let warehouse = warehouse::insert_warehouse(profile.id, &mut tx).await?;
                debug!("🗃️ Virtual warehouse #{} created for shipper {}", warehouse.id, profile.id);
                Profile::Shipper(profile)
            },
            Role::Carrier => Profile::Carrier(accounts::insert_carrier_profile(&created, coordinates, &mut tx).await?),
        };
        tx.commit().await?;
        Ok((created, profile))
    }

    async fn fetch_account(&self, account_id: i64) -> Result<Option<Account>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let account = accounts::fetch_account(account_id, &mut conn).await?;
        Ok(account)
    }

    async fn fetch_account_by_username(&self, username: &str) -> Result<Option<Account>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let account = accounts::fetch_account_by_username(username, &mut conn).await?;
        Ok(account)
    }

    async fn fetch_shipper_profile(&self, account_id: i64) -> Result<Option<ShipperProfile>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let profile = accounts::fetch_shipper_profile(account_id, &mut conn).await?;
        Ok(profile)
    }

    async fn fetch_carrier_profile(&self, account_id: i64) -> Result<Option<CarrierProfile>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let profile = accounts::fetch_carrier_profile(account_id, &mut conn).await?;
        Ok(profile)
    }
}

impl WarehouseManagement for SqliteDatabase {
    async fn fetch_warehouse(&self, shipper_id: i64) -> Result<Option<VirtualWarehouse>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let warehouse = warehouse::fetch_warehouse(shipper_id, &mut conn).await?;
        Ok(warehouse)
    }

    async fn upsert_stock_line(
        &self,
        warehouse_id: i64,
        item_id: i64,
        initial_quantity: f64,
    ) -> Result<(), MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        warehouse::upsert_stock_line(warehouse_id, item_id, initial_quantity, &mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn recompute_stock(&self, shipper_id: i64) -> Result<Vec<WarehouseStock>, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let lines = warehouse::fetch_stock(shipper_id, &mut tx).await?;
        let committed = warehouse::committed_weights(shipper_id, &mut tx).await?;
        for line in &lines {
            let used = committed.get(&line.item_id).copied().unwrap_or_default();
            let available = available_quantity(line.initial_quantity, used);
            if available != line.available_quantity {
                warehouse::set_available_quantity(line.id, available, &mut tx).await?;
                trace!("🗃️ Stock line #{} ({}) now has {available}kg available", line.id, line.item_name);
            }
        }
        let lines = warehouse::fetch_stock(shipper_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Recomputed {} stock lines for shipper {shipper_id}", lines.len());
        Ok(lines)
    }

    async fn fetch_stock(&self, shipper_id: i64) -> Result<Vec<WarehouseStock>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let stock = warehouse::fetch_stock(shipper_id, &mut conn).await?;
        Ok(stock)
    }
}

impl MarketplaceDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_cargo_item(&self, shipper_id: i64, item: NewCargoItem) -> Result<CargoItem, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let item = items::insert_cargo_item(shipper_id, item, &mut tx).await?;
        tx.commit().await?;
        Ok(item)
    }

    async fn fetch_cargo_items_for_shipper(&self, shipper_id: i64) -> Result<Vec<CargoItem>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let items = items::fetch_cargo_items_for_shipper(shipper_id, &mut conn).await?;
        Ok(items)
    }

    async fn fetch_cargo_items(&self, ids: &[i64]) -> Result<Vec<CargoItem>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let items = items::fetch_cargo_items(ids, &mut conn).await?;
        Ok(items)
    }

    async fn insert_transport_item(
        &self,
        carrier_id: i64,
        item: NewTransportItem,
    ) -> Result<TransportItem, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let item = items::insert_transport_item(carrier_id, item, &mut tx).await?;
        tx.commit().await?;
        Ok(item)
    }

    async fn fetch_transport_items_for_carrier(&self, carrier_id: i64) -> Result<Vec<TransportItem>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let items = items::fetch_transport_items_for_carrier(carrier_id, &mut conn).await?;
        Ok(items)
    }

    async fn fetch_transport_items(&self, ids: &[i64]) -> Result<Vec<TransportItem>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let items = items::fetch_transport_items(ids, &mut conn).await?;
        Ok(items)
    }

    async fn insert_category(
        &self,
        kind: CategoryKind,
        name: &str,
        description: Option<String>,
    ) -> Result<Category, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let category = categories::insert_category(kind, name, description, &mut tx).await?;
        tx.commit().await?;
        Ok(category)
    }

    async fn fetch_categories(&self, kind: CategoryKind) -> Result<Vec<Category>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let categories = categories::fetch_categories(kind, &mut conn).await?;
        Ok(categories)
    }

    async fn fetch_categories_by_id(&self, kind: CategoryKind, ids: &[i64]) -> Result<Vec<Category>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let categories = categories::fetch_categories_by_id(kind, ids, &mut conn).await?;
        Ok(categories)
    }

    async fn insert_cargo_order(&self, order: NewCargoOrder) -> Result<CargoOrder, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let order = cargo_orders::insert_cargo_order(order, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_cargo_order(&self, id: i64) -> Result<Option<CargoOrder>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let order = cargo_orders::fetch_cargo_order(id, &mut conn).await?;
        Ok(order)
    }

    async fn search_cargo_orders(&self, query: CargoOrderQuery) -> Result<Vec<CargoOrder>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let orders = cargo_orders::search_cargo_orders(query, &mut conn).await?;
        Ok(orders)
    }

    async fn count_cargo_orders_for_shipper(&self, shipper_id: i64) -> Result<i64, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let count = cargo_orders::count_cargo_orders_for_shipper(shipper_id, &mut conn).await?;
        Ok(count)
    }

    async fn insert_transport_order(&self, order: NewTransportOrder) -> Result<TransportOrder, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let order = transport_orders::insert_transport_order(order, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_transport_order(&self, id: i64) -> Result<Option<TransportOrder>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let order = transport_orders::fetch_transport_order(id, &mut conn).await?;
        Ok(order)
    }

    async fn search_transport_orders(
        &self,
        query: TransportOrderQuery,
    ) -> Result<Vec<TransportOrder>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let orders = transport_orders::search_transport_orders(query, &mut conn).await?;
        Ok(orders)
    }

    async fn count_transport_orders_for_carrier(&self, carrier_id: i64) -> Result<i64, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let count = transport_orders::count_transport_orders_for_carrier(carrier_id, &mut conn).await?;
        Ok(count)
    }

    /// In a single atomic transaction:
    /// * inserts the contract row. This is the claim on both orders and must come first.
    /// * looks up the carrier that owns the transport order.
    /// * marks the cargo order as accepted by that carrier.
    async fn insert_contract(&self, contract: NewContract) -> Result<ShipmentContract, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let inserted = contracts::insert_contract(&contract, &mut tx).await?;
        let transport_order = transport_orders::fetch_transport_order(contract.transport_order_id, &mut tx)
            .await?
            .ok_or(MarketplaceError::TransportOrderNotFound(contract.transport_order_id))?;
        cargo_orders::mark_accepted(contract.cargo_order_id, transport_order.carrier_id, contract.created_at, &mut tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => MarketplaceError::CargoOrderNotFound(contract.cargo_order_id),
                e => e.into(),
            })?;
        tx.commit().await?;
        info!(
            "🗃️ Contract {} binds cargo order #{} to transport order #{}",
            inserted.contract_number, inserted.cargo_order_id, inserted.transport_order_id
        );
        Ok(inserted)
    }

    async fn fetch_contract(&self, id: i64) -> Result<Option<ShipmentContract>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let contract = contracts::fetch_contract(id, &mut conn).await?;
        Ok(contract)
    }

    async fn fetch_contract_by_number(
        &self,
        number: &ContractNumber,
    ) -> Result<Option<ShipmentContract>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let contract = contracts::fetch_contract_by_number(number, &mut conn).await?;
        Ok(contract)
    }

    async fn fetch_contracts_for_carrier(&self, carrier_id: i64) -> Result<Vec<ShipmentContract>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let contracts = contracts::fetch_contracts_for_carrier(carrier_id, &mut conn).await?;
        Ok(contracts)
    }

    async fn fetch_contracts_for_shipper(&self, shipper_id: i64) -> Result<Vec<ShipmentContract>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let contracts = contracts::fetch_contracts_for_shipper(shipper_id, &mut conn).await?;
        Ok(contracts)
    }

    async fn insert_cmr_document(
        &self,
        contract_id: i64,
        file_path: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<CmrDocument, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let document = cmr::insert_cmr_document(contract_id, file_path, generated_at, &mut tx).await?;
        tx.commit().await?;
        Ok(document)
    }

    async fn fetch_cmr_documents(&self, contract_id: i64) -> Result<Vec<CmrDocument>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let documents = cmr::fetch_cmr_documents(contract_id, &mut conn).await?;
        Ok(documents)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the `FMS_DATABASE_URL` environment variable (or the default URL).
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Applies any outstanding schema migrations.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations are up to date");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
