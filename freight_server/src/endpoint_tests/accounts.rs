use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use freight_common::Coordinate;
use freight_engine::{
    db_types::{Account, Profile, Role, ShipperProfile},
    traits::AccountApiError,
    AccountApi,
};
use serde_json::json;

use super::{
    helpers::{carrier, get_request, json, post_request, shipper},
    mocks::{MockAccountManager, MockAddressBook},
};
use crate::{
    middleware::IdentityMiddlewareFactory,
    routes::{MyAccountRoute, RegisterRoute},
};

const RIGA: Coordinate = Coordinate { longitude: 24.1052, latitude: 56.9496 };

#[actix_web::test]
async fn fetch_my_account_no_headers() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(None, "/api/account", |cfg| configure(cfg, MockAccountManager::new())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json(&body)["error"], "Missing or invalid identity. The fms_account_id header is missing.");
}

#[actix_web::test]
async fn fetch_my_account() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_account().returning(|id| Ok(Some(acme_account(id))));
    accounts.expect_fetch_shipper_profile().returning(|id| Ok(Some(acme_profile(id))));
    let (status, body) = get_request(shipper(7), "/api/account", |cfg| configure(cfg, accounts)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["account"]["username"], "acme");
    assert_eq!(body["profile"]["role"], "shipper");
    assert_eq!(body["profile"]["warehouse_address"], "Riga, Latvia");
}

#[actix_web::test]
async fn fetch_unknown_account() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_account().returning(|_| Ok(None));
    let (status, _) = get_request(carrier(99), "/api/account", |cfg| configure(cfg, accounts)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn register_with_unresolvable_address() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts
        .expect_create_account()
        .withf(|account, coordinates| {
            account.username == "acme" && coordinates.legal.is_none() && coordinates.warehouse == Some(RIGA)
        })
        .times(1)
        .returning(|_, _| Ok((acme_account(7), Profile::Shipper(acme_profile(7)))));
    let mut geocoder = MockAddressBook::new();
    geocoder.expect_resolve_address().returning(|address| (address == "Riga, Latvia").then_some(RIGA));
    let body = registration("Nowhere 1");
    let (status, body) = post_request(None, "/register", &body, |cfg| configure_with(cfg, accounts, geocoder)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json(&body)["account"]["id"], 7);
}

#[actix_web::test]
async fn register_rejects_invalid_email() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts.expect_create_account().never();
    let mut geocoder = MockAddressBook::new();
    geocoder.expect_resolve_address().never();
    let mut body = registration("Riga, Latvia");
    body["email"] = json!("acme.example.test");
    let (status, body) = post_request(None, "/register", &body, |cfg| configure_with(cfg, accounts, geocoder)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json(&body), json!({"error": "Enter a valid email address.", "field": "email"}));
}

#[actix_web::test]
async fn register_duplicate_username() {
    let _ = env_logger::try_init().ok();
    let mut accounts = MockAccountManager::new();
    accounts
        .expect_create_account()
        .returning(|_, _| Err(AccountApiError::DuplicateAccount("UNIQUE constraint failed: accounts.username".into())));
    let mut geocoder = MockAddressBook::new();
    geocoder.expect_resolve_address().returning(|_| Some(RIGA));
    let body = registration("Riga, Latvia");
    let (status, _) = post_request(None, "/register", &body, |cfg| configure_with(cfg, accounts, geocoder)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

fn registration(address: &str) -> serde_json::Value {
    json!({
        "username": "acme",
        "email": "ops@acme.test",
        "company_name": "Acme Freight",
        "address": address,
        "contact_person": "Ilze",
        "role": "shipper",
        "warehouse_address": "Riga, Latvia"
    })
}

fn acme_account(id: i64) -> Account {
    Account {
        id,
        username: "acme".into(),
        email: "ops@acme.test".into(),
        role: Role::Shipper,
        company_name: "Acme Freight".into(),
        address: "Brivibas iela 1, Riga".into(),
        vat_number: None,
        phone_number: None,
        contact_person: "Ilze".into(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
    }
}

fn acme_profile(account_id: i64) -> ShipperProfile {
    ShipperProfile {
        id: 3,
        account_id,
        legal_address: "Brivibas iela 1, Riga".into(),
        legal_address_latitude: None,
        legal_address_longitude: None,
        warehouse_address: Some("Riga, Latvia".into()),
        warehouse_latitude: Some(RIGA.latitude),
        warehouse_longitude: Some(RIGA.longitude),
        contact_person: "Ilze".into(),
        phone_number: None,
        email: "ops@acme.test".into(),
        vat_number: None,
    }
}

fn configure(cfg: &mut ServiceConfig, accounts: MockAccountManager) {
    configure_with(cfg, accounts, MockAddressBook::new())
}

fn configure_with(cfg: &mut ServiceConfig, accounts: MockAccountManager, geocoder: MockAddressBook) {
    let accounts_api = AccountApi::new(accounts);
    cfg.service(RegisterRoute::<MockAccountManager, MockAddressBook>::new())
        .service(
            web::scope("/api")
                .wrap(IdentityMiddlewareFactory::new())
                .service(MyAccountRoute::<MockAccountManager>::new()),
        )
        .app_data(web::Data::new(accounts_api))
        .app_data(web::Data::new(geocoder));
}
