//! End-to-end request flows against a real, freshly migrated SQLite database and a fixed address book.
use actix_web::{http::StatusCode, test::TestRequest, web::ServiceConfig};
use freight_engine::{
    db_types::Role,
    test_utils::{prepare_env::fresh_database, static_geocoder::StaticGeocoder},
    SqliteDatabase,
};
use serde_json::{json, Value};

use super::helpers::{carrier, get_request, post_request, send, shipper};
use crate::{
    auth::Caller,
    server::{add_app_data, configure_routes},
};

struct TestMarket {
    db: SqliteDatabase,
    geocoder: StaticGeocoder,
}

impl TestMarket {
    async fn new() -> Self {
        let _ = env_logger::try_init().ok();
        Self { db: fresh_database().await, geocoder: StaticGeocoder::baltic() }
    }

    fn configure(&self) -> impl FnOnce(&mut ServiceConfig) {
        let db = self.db.clone();
        let geocoder = self.geocoder.clone();
        move |cfg| {
            add_app_data(cfg, db, geocoder);
            configure_routes::<SqliteDatabase, StaticGeocoder>(cfg);
        }
    }

    async fn get(&self, caller: Option<Caller>, path: &str) -> (StatusCode, Value) {
        let (status, body) = get_request(caller, path, self.configure()).await;
        (status, serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    async fn post(&self, caller: Option<Caller>, path: &str, body: Value) -> (StatusCode, Value) {
        let (status, body) = post_request(caller, path, &body, self.configure()).await;
        (status, serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    async fn created(&self, caller: Option<Caller>, path: &str, body: Value) -> i64 {
        let (status, body) = self.post(caller, path, body).await;
        assert_eq!(status, StatusCode::CREATED, "POST {path} failed: {body}");
        body["id"].as_i64().expect("Response has no id")
    }

    async fn register(&self, username: &str, role: Role) -> i64 {
        let body = json!({
            "username": username,
            "email": format!("{username}@example.test"),
            "company_name": format!("{username} SIA"),
            "address": "Riga, Latvia",
            "contact_person": "Dispatch desk",
            "role": role,
            "warehouse_address": "Riga, Latvia"
        });
        let (status, body) = self.post(None, "/register", body).await;
        assert_eq!(status, StatusCode::CREATED, "Registration failed: {body}");
        body["account"]["id"].as_i64().expect("Response has no account id")
    }

    async fn cargo_order(&self, account_id: i64, item_id: i64) -> i64 {
        let order = json!({
            "loading_address": "Riga, Latvia",
            "unloading_address": "Vilnius, Lithuania",
            "cargo_items": [item_id],
            "price": 150_000,
            "trailer_type": "reefer"
        });
        self.created(shipper(account_id), "/api/cargo_orders", order).await
    }

    async fn transport_order(&self, account_id: i64, trailer_number: &str) -> i64 {
        let truck = json!({
            "driver_license": format!("DL-{trailer_number}"),
            "truck_number": format!("TK-{trailer_number}"),
            "trailer_number": trailer_number,
            "trailer_type": "reefer"
        });
        let truck_id = self.created(carrier(account_id), "/api/transport_items", truck).await;
        let order = json!({
            "loading_address": "Riga, Latvia",
            "unloading_address": "Tallinn, Estonia",
            "transport_items": [truck_id],
            "price": 90_000
        });
        self.created(carrier(account_id), "/api/transport_orders", order).await
    }
}

fn flour() -> Value {
    json!({"name": "Flour", "volume": 2.5, "weight": 250.0})
}

#[actix_web::test]
async fn contract_formation() {
    let market = TestMarket::new().await;
    let shipper_id = market.register("baltic_foods", Role::Shipper).await;
    let item_id = market.created(shipper(shipper_id), "/api/cargo_items", flour()).await;
    let cargo_order = market.cargo_order(shipper_id, item_id).await;

    let (status, order) = market.get(shipper(shipper_id), &format!("/api/cargo_orders/{cargo_order}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["loading_points"][0]["city"], "Riga, Latvia");
    assert_eq!(order["is_accepted"], false);

    let carrier_id = market.register("daugava_haulage", Role::Carrier).await;
    let transport_order = market.transport_order(carrier_id, "TR-001").await;

    let (status, candidates) = market.get(carrier(carrier_id), "/api/contracts/candidates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(candidates["cargo_orders"][0]["id"], cargo_order);
    assert_eq!(candidates["transport_orders"][0]["id"], transport_order);

    let offer = json!({"cargo_order": cargo_order, "transport_order": transport_order, "price": 140_000});
    let (status, contract) = market.post(carrier(carrier_id), "/api/contracts", offer).await;
    assert_eq!(status, StatusCode::CREATED, "{contract}");
    let contract_id = contract["id"].as_i64().unwrap();
    let number = contract["contract_number"].as_str().unwrap().to_string();
    assert!(number.starts_with("CONTRACT-"));

    // A rival carrier is too late
    let rival_id = market.register("rival_trucks", Role::Carrier).await;
    let rival_order = market.transport_order(rival_id, "TR-002").await;
    let offer = json!({"cargo_order": cargo_order, "transport_order": rival_order, "price": 120_000});
    let (status, body) = market.post(carrier(rival_id), "/api/contracts", offer).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Selected cargo order is already in a contract.");

    let (status, body) = market.get(shipper(shipper_id), &format!("/api/contracts/{contract_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contract_number"], number.as_str());
    let (status, _) = market.get(carrier(rival_id), &format!("/api/contracts/{contract_id}")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = market.get(carrier(carrier_id), &format!("/api/contracts/number/{number}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], contract_id);
    let (status, _) = market.get(carrier(carrier_id), "/api/contracts/number/CONTRACT-2024").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, contracts) = market.get(shipper(shipper_id), "/api/contracts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(contracts.as_array().map(Vec::len), Some(1));

    let cmr_path = format!("/api/contracts/{contract_id}/cmr");
    let (status, _) = market.post(carrier(carrier_id), &cmr_path, json!({"file_path": "cmr/riga-vilnius.pdf"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, documents) = market.get(shipper(shipper_id), &cmr_path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(documents[0]["file_path"], "cmr/riga-vilnius.pdf");

    let (_, order) = market.get(carrier(rival_id), &format!("/api/cargo_orders/{cargo_order}")).await;
    assert_eq!(order["is_accepted"], true);
    assert_eq!(order["contract_id"], contract_id);
}

#[actix_web::test]
async fn role_checks() {
    let market = TestMarket::new().await;
    let shipper_id = market.register("baltic_foods", Role::Shipper).await;
    let carrier_id = market.register("daugava_haulage", Role::Carrier).await;

    let order = json!({
        "loading_address": "Riga, Latvia",
        "unloading_address": "Tallinn, Estonia",
        "transport_items": [1],
        "price": 90_000
    });
    let (status, body) = market.post(shipper(shipper_id), "/api/transport_orders", order).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Insufficient Permissions. This action is not available to a shipper.");

    let (status, _) = market.get(carrier(carrier_id), "/api/warehouse").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = market.post(carrier(carrier_id), "/api/cargo_items", flour()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = market.get(None, "/api/cargo_orders").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = market.get(shipper(shipper_id), "/api/cargo_orders").await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn unresolvable_address_is_a_field_error() {
    let market = TestMarket::new().await;
    let shipper_id = market.register("baltic_foods", Role::Shipper).await;
    let item_id = market.created(shipper(shipper_id), "/api/cargo_items", flour()).await;
    let order = json!({
        "loading_address": "Riga, Latvia",
        "unloading_address": "Atlantis",
        "cargo_items": [item_id],
        "price": 150_000
    });
    let (status, body) = market.post(shipper(shipper_id), "/api/cargo_orders", order).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"error": "Could not find coordinates for this address.", "field": "unloading_address"}));

    let (status, orders) = market.get(shipper(shipper_id), "/api/cargo_orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders, json!([]));
}

#[actix_web::test]
async fn warehouse_stock_follows_orders() {
    let market = TestMarket::new().await;
    let shipper_id = market.register("baltic_foods", Role::Shipper).await;
    let item_id = market.created(shipper(shipper_id), "/api/cargo_items", flour()).await;
    let stock = json!({"item_id": item_id, "initial_quantity": 1000.0});
    let (status, view) = market.post(shipper(shipper_id), "/api/warehouse/stock", stock).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["stock"][0]["available_quantity"], 1000.0);

    market.cargo_order(shipper_id, item_id).await;
    let (status, view) = market.get(shipper(shipper_id), "/api/warehouse").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["stock"][0]["item_name"], "Flour");
    assert_eq!(view["stock"][0]["available_quantity"], 750.0);

    let (status, dashboard) = market.get(shipper(shipper_id), "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["role"], "shipper");
    assert_eq!(dashboard["total_cargo_orders"], 1);
}

#[actix_web::test]
async fn cargo_order_route_and_preview() {
    let market = TestMarket::new().await;
    let shipper_id = market.register("baltic_foods", Role::Shipper).await;
    let item_id = market.created(shipper(shipper_id), "/api/cargo_items", flour()).await;
    let cargo_order = market.cargo_order(shipper_id, item_id).await;

    let (status, route) = market.get(shipper(shipper_id), &format!("/api/cargo_orders/{cargo_order}/route")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(route["estimate"]["distance_km"], 100.0);
    assert_eq!(route["estimate"]["travel_time_minutes"], 70.59);
    assert_eq!(route["estimate"]["fuel_cost"], 48.0);

    let (status, _) = market.get(shipper(shipper_id), "/api/cargo_orders/9999/route").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = json!({"start_address": "Riga, Latvia", "end_address": "Kaunas, Lithuania"});
    let (status, preview) = market.post(shipper(shipper_id), "/api/route_preview", request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["start"], json!([24.1052, 56.9496]));
    assert_eq!(preview["routes"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn malformed_requests() {
    let market = TestMarket::new().await;
    let shipper_id = market.register("baltic_foods", Role::Shipper).await;
    let req = TestRequest::post()
        .uri("/api/cargo_items")
        .insert_header(("content-type", "application/json"))
        .insert_header(("fms_account_id", shipper_id.to_string()))
        .insert_header(("fms_account_role", "shipper"))
        .set_payload("{\"name\": \"Flour\", ");
    let (status, body) = send(req, market.configure()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Could not read request body"), "{body}");

    let (status, _) = market.get(shipper(shipper_id), "/api/contracts/first").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn trailer_types_are_case_insensitive_on_the_wire() {
    let market = TestMarket::new().await;
    let carrier_id = market.register("daugava_haulage", Role::Carrier).await;
    let order_id = market.transport_order(carrier_id, "LV-REEF-1").await;

    let (status, body) = market.get(carrier(carrier_id), "/api/transport_orders?transport_type=Reefer").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body[0]["id"].as_i64(), Some(order_id));
    let (status, body) = market.get(carrier(carrier_id), "/api/transport_orders?transport_type=REEFER").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    let path = "/api/transport_orders?transport_type=Dump%20Trailer";
    let (status, body) = market.get(carrier(carrier_id), path).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body.as_array().map(Vec::len), Some(0));
    let (status, _) = market.get(carrier(carrier_id), "/api/transport_orders?transport_type=hovercraft").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let shipper_id = market.register("baltic_foods", Role::Shipper).await;
    let item_id = market.created(shipper(shipper_id), "/api/cargo_items", flour()).await;
    let order = json!({
        "loading_address": "Riga, Latvia",
        "unloading_address": "Vilnius, Lithuania",
        "cargo_items": [item_id],
        "price": 150_000,
        "trailer_type": "Insulated Trailer"
    });
    let (status, body) = market.post(shipper(shipper_id), "/api/cargo_orders", order).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["trailer_type"], json!("insulated trailer"));
}
