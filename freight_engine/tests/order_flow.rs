mod common;

use common::{cargo_request, transport_request, Market, RIGA, TALLINN, VILNIUS};
use freight_common::{Coordinate, Money};
use freight_engine::{
    db_types::{CategoryKind, NewTransportItem, Role, TrailerType},
    fe_api::account_objects::Dashboard,
    order_objects::{CargoOrderQuery, TransportOrderQuery},
    test_utils::static_geocoder::StaticGeocoder,
    MarketplaceError,
};

fn field_of(err: MarketplaceError) -> Option<String> {
    match err {
        MarketplaceError::Validation(e) => e.field,
        e => panic!("Expected a validation error, got {e:?}"),
    }
}

#[tokio::test]
async fn cargo_order_records_points_and_routes() {
    let market = Market::new().await;
    let shipper = market.register("shipper", Role::Shipper).await;
    let flour = market.cargo_item(shipper, "Flour", 250.0).await;
    let sugar = market.cargo_item(shipper, "Sugar", 100.0).await;
    let category = market.catalogue().add_category(CategoryKind::Cargo, "Food", None).await.unwrap();

    let mut request = cargo_request(vec![sugar.id, flour.id, sugar.id]);
    request.categories = vec![category.id];
    let order = market.orders().create_cargo_order(shipper, request).await.unwrap();

    assert_eq!(order.cargo_item_ids, vec![flour.id, sugar.id]);
    assert_eq!(order.category_ids, vec![category.id]);
    assert_eq!(order.loading_points.len(), 1);
    assert_eq!(order.loading_points[0].city, RIGA);
    assert_eq!(order.loading_points[0].coordinates, Coordinate::new(24.1052, 56.9496));
    assert_eq!(order.unloading_points[0].city, VILNIUS);
    assert_eq!(order.price, Money::from_units(1500));
    assert_eq!(order.trailer_type, Some(TrailerType::Reefer));
    assert!(!order.is_accepted);
    assert!(order.contract_id.is_none());
    let routes = order.route_info.as_ref().expect("Order should carry route info");
    assert_eq!(routes[0].distance, 100.0);

    let fetched = market.orders().cargo_order(order.id).await.unwrap();
    assert_eq!(fetched, order);

    let route = market.orders().cargo_order_route(order.id).await.unwrap();
    assert_eq!(route.estimate.distance_km, 100.0);
    assert_eq!(route.estimate.travel_time_minutes, 70.59);
    assert_eq!(route.estimate.fuel_cost, 48.0);
}

#[tokio::test]
async fn unresolved_addresses_never_persist_an_order() {
    let market = Market::new().await;
    let shipper = market.register("shipper", Role::Shipper).await;
    let item = market.cargo_item(shipper, "Flour", 250.0).await;

    let mut request = cargo_request(vec![item.id]);
    request.unloading_address = "Atlantis".to_string();
    let err = market.orders().create_cargo_order(shipper, request).await.unwrap_err();
    assert_eq!(field_of(err).as_deref(), Some("unloading_address"));

    let mut request = cargo_request(vec![item.id]);
    request.loading_address = "El Dorado".to_string();
    request.unloading_address = "Atlantis".to_string();
    let err = market.orders().create_cargo_order(shipper, request).await.unwrap_err();
    assert_eq!(field_of(err).as_deref(), Some("loading_address"));

    let carrier = market.register("carrier", Role::Carrier).await;
    let truck = market.transport_item(carrier, "TR-001").await;
    let mut request = transport_request(vec![truck.id]);
    request.loading_address = "Shangri-La".to_string();
    let err = market.orders().create_transport_order(carrier, request).await.unwrap_err();
    assert_eq!(field_of(err).as_deref(), Some("loading_address"));

    assert!(market.orders().search_cargo_orders(CargoOrderQuery::default()).await.unwrap().is_empty());
    assert!(market.orders().search_transport_orders(TransportOrderQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_prevalidation_skips_the_geocoder() {
    let market = Market::new().await;
    let shipper = market.register("shipper", Role::Shipper).await;
    let neighbour = market.register("neighbour", Role::Shipper).await;
    let own = market.cargo_item(shipper, "Flour", 250.0).await;
    let foreign = market.cargo_item(neighbour, "Timber", 900.0).await;
    let calls = market.geocoder.calls();

    let mut request = cargo_request(vec![own.id]);
    request.loading_address = "   ".to_string();
    let err = market.orders().create_cargo_order(shipper, request).await.unwrap_err();
    assert_eq!(field_of(err).as_deref(), Some("loading_address"));

    let mut request = cargo_request(vec![own.id]);
    request.price = Money::from(-1);
    let err = market.orders().create_cargo_order(shipper, request).await.unwrap_err();
    assert_eq!(field_of(err).as_deref(), Some("price"));

    let err = market.orders().create_cargo_order(shipper, cargo_request(vec![])).await.unwrap_err();
    assert_eq!(field_of(err).as_deref(), Some("cargo_items"));

    let err = market.orders().create_cargo_order(shipper, cargo_request(vec![own.id, foreign.id])).await.unwrap_err();
    assert_eq!(field_of(err).as_deref(), Some("cargo_items"));

    let err = market.orders().create_cargo_order(shipper, cargo_request(vec![own.id + 1000])).await.unwrap_err();
    assert_eq!(field_of(err).as_deref(), Some("cargo_items"));

    let mut request = cargo_request(vec![own.id]);
    request.categories = vec![42];
    let err = market.orders().create_cargo_order(shipper, request).await.unwrap_err();
    assert_eq!(field_of(err).as_deref(), Some("categories"));

    assert_eq!(market.geocoder.calls(), calls);
}

#[tokio::test]
async fn missing_route_does_not_block_orders() {
    let market = Market::with_geocoder(StaticGeocoder::baltic().without_routes()).await;
    let shipper = market.register("shipper", Role::Shipper).await;
    let item = market.cargo_item(shipper, "Flour", 250.0).await;
    let order = market.cargo_order(shipper, vec![item.id]).await;
    assert!(order.route_info.is_none());

    let route = market.orders().cargo_order_route(order.id).await.unwrap();
    assert_eq!(route.estimate.distance_km, 0.0);
    assert_eq!(route.estimate.travel_time_minutes, 0.0);
    assert_eq!(route.estimate.fuel_cost, 0.0);
}

#[tokio::test]
async fn orders_are_role_bound() {
    let market = Market::new().await;
    let shipper = market.register("shipper", Role::Shipper).await;
    let carrier = market.register("carrier", Role::Carrier).await;
    let err = market.orders().create_transport_order(shipper, transport_request(vec![1])).await.unwrap_err();
    assert!(matches!(err, MarketplaceError::ProfileNotFound { role: Role::Carrier, .. }), "{err:?}");
    let err = market.orders().create_cargo_order(carrier, cargo_request(vec![1])).await.unwrap_err();
    assert!(matches!(err, MarketplaceError::ProfileNotFound { role: Role::Shipper, .. }), "{err:?}");
}

#[tokio::test]
async fn unknown_orders_are_not_found() {
    let market = Market::new().await;
    let err = market.orders().cargo_order(77).await.unwrap_err();
    assert!(matches!(err, MarketplaceError::CargoOrderNotFound(77)));
    let err = market.orders().transport_order(78).await.unwrap_err();
    assert!(matches!(err, MarketplaceError::TransportOrderNotFound(78)));
    let err = market.orders().cargo_order_route(79).await.unwrap_err();
    assert!(matches!(err, MarketplaceError::CargoOrderNotFound(79)));
}

#[tokio::test]
async fn cargo_search_matches_item_names_and_categories() {
    let market = Market::new().await;
    let shipper = market.register("shipper", Role::Shipper).await;
    let flour = market.cargo_item(shipper, "Wheat flour", 250.0).await;
    let rye = market.cargo_item(shipper, "Rye Flour", 250.0).await;
    let timber = market.cargo_item(shipper, "Timber 50%", 900.0).await;
    let food = market.catalogue().add_category(CategoryKind::Cargo, "Food", None).await.unwrap();

    let mut request = cargo_request(vec![flour.id, rye.id]);
    request.categories = vec![food.id];
    let both_flours = market.orders().create_cargo_order(shipper, request).await.unwrap();
    let wood = market.cargo_order(shipper, vec![timber.id]).await;
    let rye_only = market.cargo_order(shipper, vec![rye.id]).await;

    let found = market.orders().search_cargo_orders(CargoOrderQuery::default().with_text("FLOUR")).await.unwrap();
    let ids = found.iter().map(|o| o.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![rye_only.id, both_flours.id]);

    let found = market.orders().search_cargo_orders(CargoOrderQuery::default().with_text("50%")).await.unwrap();
    assert_eq!(found.iter().map(|o| o.id).collect::<Vec<_>>(), vec![wood.id]);

    let found = market.orders().search_cargo_orders(CargoOrderQuery::default().with_category(food.id)).await.unwrap();
    assert_eq!(found.iter().map(|o| o.id).collect::<Vec<_>>(), vec![both_flours.id]);

    let all = market.orders().search_cargo_orders(CargoOrderQuery::default().with_text("  ")).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn transport_search_matches_plates_and_trailer_types() {
    let market = Market::new().await;
    let carrier = market.register("carrier", Role::Carrier).await;
    let reefer = market.transport_item(carrier, "LV-REEF-1").await;
    let tipper = NewTransportItem::new("DL-2", "TRUCK-2", "LV-TIP-2", TrailerType::DumpTrailer);
    let tipper = market.catalogue().add_transport_item(carrier, tipper).await.unwrap();

    let cold = market.transport_order(carrier, vec![reefer.id]).await;
    let bulk = market.transport_order(carrier, vec![tipper.id]).await;
    let mixed = market.transport_order(carrier, vec![reefer.id, tipper.id]).await;

    let api = market.orders();
    let found = api.search_transport_orders(TransportOrderQuery::default().with_text("lv-reef")).await.unwrap();
    assert_eq!(found.iter().map(|o| o.id).collect::<Vec<_>>(), vec![mixed.id, cold.id]);

    let query = TransportOrderQuery::default().with_transport_type(TrailerType::DumpTrailer);
    let found = api.search_transport_orders(query).await.unwrap();
    assert_eq!(found.iter().map(|o| o.id).collect::<Vec<_>>(), vec![mixed.id, bulk.id]);

    let detail = api.transport_order(mixed.id).await.unwrap();
    assert_eq!(detail.transport_item_ids, vec![reefer.id, tipper.id]);
    assert_eq!(detail.unloading_points[0].city, TALLINN);
}

#[tokio::test]
async fn dashboards_show_recent_orders_and_totals() {
    let market = Market::new().await;
    let shipper = market.register("shipper", Role::Shipper).await;
    let carrier = market.register("carrier", Role::Carrier).await;
    let item = market.cargo_item(shipper, "Flour", 1.0).await;
    let mut newest = 0;
    for _ in 0..12 {
        newest = market.cargo_order(shipper, vec![item.id]).await.id;
    }

    match market.orders().dashboard(shipper).await.unwrap() {
        Dashboard::Shipper { recent_cargo_orders, total_cargo_orders, .. } => {
            assert_eq!(total_cargo_orders, 12);
            assert_eq!(recent_cargo_orders.len(), 10);
            assert_eq!(recent_cargo_orders[0].id, newest);
        },
        d => panic!("Unexpected dashboard {d:?}"),
    }
    match market.orders().dashboard(carrier).await.unwrap() {
        Dashboard::Carrier { recent_transport_orders, total_transport_orders, .. } => {
            assert_eq!(total_transport_orders, 0);
            assert!(recent_transport_orders.is_empty());
        },
        d => panic!("Unexpected dashboard {d:?}"),
    }
    assert!(market.orders().dashboard(999).await.is_err());
}

#[tokio::test]
async fn route_preview_is_best_effort() {
    let market = Market::new().await;
    let preview = market.orders().route_preview(RIGA, TALLINN).await;
    assert!(preview.start.is_some());
    assert!(preview.end.is_some());
    assert_eq!(preview.routes.map(|r| r.len()), Some(1));

    let preview = market.orders().route_preview(RIGA, "Atlantis").await;
    assert!(preview.start.is_some());
    assert!(preview.end.is_none());
    assert!(preview.routes.is_none());
}

#[tokio::test]
async fn new_items_are_immediately_usable_in_orders() {
    let market = Market::new().await;
    let shipper = market.register("shipper", Role::Shipper).await;
    let carrier = market.register("carrier", Role::Carrier).await;
    for i in 0..40 {
        let cargo = market.cargo_item(shipper, &format!("Pallet load {i}"), 100.0).await;
        let order = market.orders().create_cargo_order(shipper, cargo_request(vec![cargo.id])).await;
        assert_eq!(order.unwrap().cargo_item_ids, vec![cargo.id], "cargo order {i}");

        let truck = market.transport_item(carrier, &format!("LV-{i:03}")).await;
        let order = market.orders().create_transport_order(carrier, transport_request(vec![truck.id])).await;
        assert_eq!(order.unwrap().transport_item_ids, vec![truck.id], "transport order {i}");
    }
}

#[tokio::test]
async fn text_search_ignores_case_beyond_ascii() {
    let market = Market::new().await;
    let shipper = market.register("shipper", Role::Shipper).await;
    let carrier = market.register("carrier", Role::Carrier).await;
    let flour = market.cargo_item(shipper, "Мука пшеничная", 250.0).await;
    let sugar = market.cargo_item(shipper, "Сахар", 250.0).await;
    let flour_order = market.cargo_order(shipper, vec![flour.id]).await;
    market.cargo_order(shipper, vec![sugar.id]).await;

    let api = market.orders();
    for q in ["мука", "МУКА", "Пшеничная"] {
        let found = api.search_cargo_orders(CargoOrderQuery::default().with_text(q)).await.unwrap();
        assert_eq!(found.iter().map(|o| o.id).collect::<Vec<_>>(), vec![flour_order.id], "query {q}");
    }
    let found = api.search_cargo_orders(CargoOrderQuery::default().with_text("соль")).await.unwrap();
    assert!(found.is_empty());

    let cyrillic = market.transport_item(carrier, "ТР-001").await;
    let latin = market.transport_item(carrier, "LV-002").await;
    let cyrillic_order = market.transport_order(carrier, vec![cyrillic.id]).await;
    market.transport_order(carrier, vec![latin.id]).await;
    let found = api.search_transport_orders(TransportOrderQuery::default().with_text("тр-0")).await.unwrap();
    assert_eq!(found.iter().map(|o| o.id).collect::<Vec<_>>(), vec![cyrillic_order.id]);
}
