use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use freight_engine::{
    traits::{Geocoder, MarketplaceDatabase},
    AccountApi,
    CatalogueApi,
    ContractApi,
    OrderFlowApi,
    SqliteDatabase,
    WarehouseApi,
};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::mapbox::MapboxGeocoder,
    middleware::IdentityMiddlewareFactory,
    routes::{
        health,
        AddCargoItemRoute,
        AddCmrDocumentRoute,
        AddStockRoute,
        AddTransportItemRoute,
        CargoCategoriesRoute,
        CargoOrderByIdRoute,
        CargoOrderRouteRoute,
        CmrDocumentsRoute,
        ContractByIdRoute,
        ContractByNumberRoute,
        ContractCandidatesRoute,
        CreateCargoOrderRoute,
        CreateContractRoute,
        CreateTransportOrderRoute,
        DashboardRoute,
        MyAccountRoute,
        MyCargoItemsRoute,
        MyContractsRoute,
        MyTransportItemsRoute,
        RegisterRoute,
        RoutePreviewRoute,
        SearchCargoOrdersRoute,
        SearchTransportOrdersRoute,
        TransportCategoriesRoute,
        TransportOrderByIdRoute,
        WarehouseRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let geocoder = MapboxGeocoder::new(config.mapbox.clone())?;
    let srv = create_server_instance(config, db, geocoder)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    geocoder: MapboxGeocoder,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("fms::access_log"))
            .configure(|cfg| add_app_data(cfg, db.clone(), geocoder.clone()))
            .configure(configure_routes::<SqliteDatabase, MapboxGeocoder>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    info!("🚀️ Freight server listening on {}:{}", config.host, config.port);
    Ok(srv)
}

/// Registers the workflow APIs and the geocoder as application data, along with extractor error handlers that report
/// malformed input in the server's JSON error format.
pub fn add_app_data<B, G>(cfg: &mut web::ServiceConfig, db: B, geocoder: G)
where
    B: MarketplaceDatabase + 'static,
    G: Geocoder + Clone + 'static,
{
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into());
    let path_config =
        web::PathConfig::default().error_handler(|err, _req| ServerError::InvalidRequestPath(err.to_string()).into());
    cfg.app_data(json_config)
        .app_data(path_config)
        .app_data(web::Data::new(AccountApi::new(db.clone())))
        .app_data(web::Data::new(CatalogueApi::new(db.clone())))
        .app_data(web::Data::new(ContractApi::new(db.clone())))
        .app_data(web::Data::new(WarehouseApi::new(db.clone())))
        .app_data(web::Data::new(OrderFlowApi::new(db, geocoder.clone())))
        .app_data(web::Data::new(geocoder));
}

/// Registers every route. Everything under `/api` requires caller identity headers; `/health` and `/register` do not.
pub fn configure_routes<B, G>(cfg: &mut web::ServiceConfig)
where
    B: MarketplaceDatabase + 'static,
    G: Geocoder + 'static,
{
    // `/contracts/candidates` and `/contracts/number/{number}` must come before `/contracts/{id}`
    let api_scope = web::scope("/api")
        .wrap(IdentityMiddlewareFactory::new())
        .service(MyAccountRoute::<B>::new())
        .service(DashboardRoute::<B, G>::new())
        .service(CargoCategoriesRoute::<B>::new())
        .service(TransportCategoriesRoute::<B>::new())
        .service(AddCargoItemRoute::<B>::new())
        .service(MyCargoItemsRoute::<B>::new())
        .service(AddTransportItemRoute::<B>::new())
        .service(MyTransportItemsRoute::<B>::new())
        .service(CreateCargoOrderRoute::<B, G>::new())
        .service(SearchCargoOrdersRoute::<B, G>::new())
        .service(CargoOrderByIdRoute::<B, G>::new())
        .service(CargoOrderRouteRoute::<B, G>::new())
        .service(CreateTransportOrderRoute::<B, G>::new())
        .service(SearchTransportOrdersRoute::<B, G>::new())
        .service(TransportOrderByIdRoute::<B, G>::new())
        .service(RoutePreviewRoute::<B, G>::new())
        .service(ContractCandidatesRoute::<B>::new())
        .service(CreateContractRoute::<B>::new())
        .service(MyContractsRoute::<B>::new())
        .service(ContractByNumberRoute::<B>::new())
        .service(ContractByIdRoute::<B>::new())
        .service(AddCmrDocumentRoute::<B>::new())
        .service(CmrDocumentsRoute::<B>::new())
        .service(AddStockRoute::<B>::new())
        .service(WarehouseRoute::<B>::new());
    cfg.service(health).service(RegisterRoute::<B, G>::new()).service(api_scope);
}
