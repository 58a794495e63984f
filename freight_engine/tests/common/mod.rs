//! A small marketplace fixture shared by the integration tests.
#![allow(dead_code)]

use freight_common::Money;
use freight_engine::{
    db_types::{CargoItem, CargoOrder, NewCargoItem, NewTransportItem, Role, TrailerType, TransportItem, TransportOrder},
    fe_api::account_objects::AccountDetails,
    order_objects::{CargoOrderRequest, TransportOrderRequest},
    test_utils::{new_account, prepare_env::fresh_database, static_geocoder::StaticGeocoder},
    AccountApi,
    CatalogueApi,
    ContractApi,
    OrderFlowApi,
    SqliteDatabase,
    WarehouseApi,
};

pub const RIGA: &str = "Riga, Latvia";
pub const VILNIUS: &str = "Vilnius, Lithuania";
pub const TALLINN: &str = "Tallinn, Estonia";

pub struct Market {
    pub db: SqliteDatabase,
    pub geocoder: StaticGeocoder,
}

impl Market {
    pub async fn new() -> Self {
        Self::with_geocoder(StaticGeocoder::baltic()).await
    }

    pub async fn with_geocoder(geocoder: StaticGeocoder) -> Self {
        Self { db: fresh_database().await, geocoder }
    }

    pub fn accounts(&self) -> AccountApi<SqliteDatabase> {
        AccountApi::new(self.db.clone())
    }

    pub fn catalogue(&self) -> CatalogueApi<SqliteDatabase> {
        CatalogueApi::new(self.db.clone())
    }

    pub fn orders(&self) -> OrderFlowApi<SqliteDatabase, StaticGeocoder> {
        OrderFlowApi::new(self.db.clone(), self.geocoder.clone())
    }

    pub fn contracts(&self) -> ContractApi<SqliteDatabase> {
        ContractApi::new(self.db.clone())
    }

    pub fn warehouse(&self) -> WarehouseApi<SqliteDatabase> {
        WarehouseApi::new(self.db.clone())
    }

    /// Registers an account with its legal address in Riga. Returns the account id.
    pub async fn register(&self, username: &str, role: Role) -> i64 {
        self.register_details(username, role).await.account.id
    }

    pub async fn register_details(&self, username: &str, role: Role) -> AccountDetails {
        self.accounts()
            .register(new_account(username, role, RIGA), &self.geocoder)
            .await
            .unwrap_or_else(|e| panic!("Could not register {username}: {e}"))
    }

    pub async fn cargo_item(&self, account_id: i64, name: &str, weight: f64) -> CargoItem {
        self.catalogue().add_cargo_item(account_id, NewCargoItem::new(name, 1.0, weight)).await.unwrap()
    }

    pub async fn transport_item(&self, account_id: i64, trailer_number: &str) -> TransportItem {
        let item = NewTransportItem::new(
            format!("DL-{trailer_number}"),
            format!("TR-{trailer_number}"),
            trailer_number.to_string(),
            TrailerType::Reefer,
        );
        self.catalogue().add_transport_item(account_id, item).await.unwrap()
    }

    pub async fn cargo_order(&self, account_id: i64, items: Vec<i64>) -> CargoOrder {
        self.orders().create_cargo_order(account_id, cargo_request(items)).await.unwrap()
    }

    pub async fn transport_order(&self, account_id: i64, items: Vec<i64>) -> TransportOrder {
        self.orders().create_transport_order(account_id, transport_request(items)).await.unwrap()
    }
}

pub fn cargo_request(cargo_items: Vec<i64>) -> CargoOrderRequest {
    CargoOrderRequest {
        loading_address: RIGA.to_string(),
        unloading_address: VILNIUS.to_string(),
        cargo_items,
        categories: vec![],
        insurance: true,
        price: Money::from_units(1500),
        trailer_type: Some(TrailerType::Reefer),
    }
}

pub fn transport_request(transport_items: Vec<i64>) -> TransportOrderRequest {
    TransportOrderRequest {
        loading_address: RIGA.to_string(),
        unloading_address: TALLINN.to_string(),
        transport_items,
        categories: vec![],
        insurance: false,
        price: Money::from_units(900),
    }
}
