//! Request handler definitions
//!
//! Define each route and its handler here. Handlers should only unpack the request, call the matching engine API and
//! package the result. Business rules live in `freight_engine`.
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. geocoding, database operations, etc.) should be expressed
//! as futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t
//! block execution.
use actix_web::{get, web, HttpResponse, Responder};
use freight_engine::{
    db_types::{CategoryKind, NewAccount, NewCargoItem, NewTransportItem, Role},
    fe_api::{
        contract_objects::{ContractRequest, NewCmrDocument},
        route_objects::RoutePreviewRequest,
        warehouse_api::StockRequest,
    },
    order_objects::{CargoOrderQuery, CargoOrderRequest, TransportOrderQuery, TransportOrderRequest},
    traits::{AccountManagement, Geocoder, MarketplaceDatabase},
    AccountApi,
    CatalogueApi,
    ContractApi,
    OrderFlowApi,
    WarehouseApi,
};
use log::*;

use crate::{auth::Caller, errors::ServerError};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($roles:expr),+])  => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Accounts  ----------------------------------------------------
route!(register => Post "/register" impl AccountManagement, Geocoder);
/// Route handler for the registration endpoint
///
/// Creates a shipper or carrier account together with its profile. Addresses are geocoded best-effort; an address
/// that cannot be found does not block registration.
pub async fn register<B, G>(
    body: web::Json<NewAccount>,
    api: web::Data<AccountApi<B>>,
    geocoder: web::Data<G>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement,
    G: Geocoder,
{
    let account = body.into_inner();
    debug!("💻️ POST register for '{}' as {}", account.username, account.role);
    let details = api.register(account, geocoder.get_ref()).await?;
    Ok(HttpResponse::Created().json(details))
}

route!(my_account => Get "/account" impl AccountManagement);
pub async fn my_account<B: AccountManagement>(
    caller: Caller,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET account for {}", caller.account_id);
    let details = api
        .account_details(caller.account_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Account {} does not exist", caller.account_id)))?;
    Ok(HttpResponse::Ok().json(details))
}

route!(dashboard => Get "/dashboard" impl MarketplaceDatabase, Geocoder);
pub async fn dashboard<B, G>(caller: Caller, api: web::Data<OrderFlowApi<B, G>>) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceDatabase,
    G: Geocoder,
{
    debug!("💻️ GET dashboard for {}", caller.account_id);
    let dashboard = api.dashboard(caller.account_id).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

//----------------------------------------------   Catalogues  ----------------------------------------------------
route!(cargo_categories => Get "/categories/cargo" impl MarketplaceDatabase);
pub async fn cargo_categories<B: MarketplaceDatabase>(
    api: web::Data<CatalogueApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let categories = api.categories(CategoryKind::Cargo).await?;
    Ok(HttpResponse::Ok().json(categories))
}

route!(transport_categories => Get "/categories/transport" impl MarketplaceDatabase);
pub async fn transport_categories<B: MarketplaceDatabase>(
    api: web::Data<CatalogueApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let categories = api.categories(CategoryKind::Transport).await?;
    Ok(HttpResponse::Ok().json(categories))
}

route!(add_cargo_item => Post "/cargo_items" impl MarketplaceDatabase where requires [Role::Shipper]);
pub async fn add_cargo_item<B: MarketplaceDatabase>(
    caller: Caller,
    body: web::Json<NewCargoItem>,
    api: web::Data<CatalogueApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST cargo item for {}", caller.account_id);
    let item = api.add_cargo_item(caller.account_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(item))
}

route!(my_cargo_items => Get "/cargo_items" impl MarketplaceDatabase where requires [Role::Shipper]);
pub async fn my_cargo_items<B: MarketplaceDatabase>(
    caller: Caller,
    api: web::Data<CatalogueApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let items = api.cargo_items(caller.account_id).await?;
    Ok(HttpResponse::Ok().json(items))
}

route!(add_transport_item => Post "/transport_items" impl MarketplaceDatabase where requires [Role::Carrier]);
pub async fn add_transport_item<B: MarketplaceDatabase>(
    caller: Caller,
    body: web::Json<NewTransportItem>,
    api: web::Data<CatalogueApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST transport item for {}", caller.account_id);
    let item = api.add_transport_item(caller.account_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(item))
}

route!(my_transport_items => Get "/transport_items" impl MarketplaceDatabase where requires [Role::Carrier]);
pub async fn my_transport_items<B: MarketplaceDatabase>(
    caller: Caller,
    api: web::Data<CatalogueApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let items = api.transport_items(caller.account_id).await?;
    Ok(HttpResponse::Ok().json(items))
}

//----------------------------------------------   Cargo orders  ----------------------------------------------------
route!(create_cargo_order => Post "/cargo_orders" impl MarketplaceDatabase, Geocoder where requires [Role::Shipper]);
/// Route handler for cargo order creation
///
/// Both addresses must resolve to coordinates. If one does not, the response is a 422 naming the address field, and
/// nothing is stored. Routes are attached when available.
pub async fn create_cargo_order<B, G>(
    caller: Caller,
    body: web::Json<CargoOrderRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceDatabase,
    G: Geocoder,
{
    debug!("💻️ POST cargo order for {}", caller.account_id);
    let order = api.create_cargo_order(caller.account_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

route!(search_cargo_orders => Get "/cargo_orders" impl MarketplaceDatabase, Geocoder);
pub async fn search_cargo_orders<B, G>(
    query: web::Query<CargoOrderQuery>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceDatabase,
    G: Geocoder,
{
    let query = query.into_inner();
    debug!("💻️ GET cargo orders. {query}");
    let orders = api.search_cargo_orders(query).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(cargo_order_by_id => Get "/cargo_orders/{id}" impl MarketplaceDatabase, Geocoder);
pub async fn cargo_order_by_id<B, G>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceDatabase,
    G: Geocoder,
{
    let order = api.cargo_order(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(cargo_order_route => Get "/cargo_orders/{id}/route" impl MarketplaceDatabase, Geocoder);
pub async fn cargo_order_route<B, G>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceDatabase,
    G: Geocoder,
{
    let route = api.cargo_order_route(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(route))
}

//----------------------------------------------   Transport orders  ------------------------------------------------
route!(create_transport_order => Post "/transport_orders" impl MarketplaceDatabase, Geocoder where requires [Role::Carrier]);
pub async fn create_transport_order<B, G>(
    caller: Caller,
    body: web::Json<TransportOrderRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceDatabase,
    G: Geocoder,
{
    debug!("💻️ POST transport order for {}", caller.account_id);
    let order = api.create_transport_order(caller.account_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

route!(search_transport_orders => Get "/transport_orders" impl MarketplaceDatabase, Geocoder);
pub async fn search_transport_orders<B, G>(
    query: web::Query<TransportOrderQuery>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceDatabase,
    G: Geocoder,
{
    let query = query.into_inner();
    debug!("💻️ GET transport orders. {query}");
    let orders = api.search_transport_orders(query).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(transport_order_by_id => Get "/transport_orders/{id}" impl MarketplaceDatabase, Geocoder);
pub async fn transport_order_by_id<B, G>(
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceDatabase,
    G: Geocoder,
{
    let order = api.transport_order(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(route_preview => Post "/route_preview" impl MarketplaceDatabase, Geocoder);
pub async fn route_preview<B, G>(
    body: web::Json<RoutePreviewRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceDatabase,
    G: Geocoder,
{
    let preview = api.route_preview(&body.start_address, &body.end_address).await;
    Ok(HttpResponse::Ok().json(preview))
}

//----------------------------------------------   Contracts  ----------------------------------------------------
route!(contract_candidates => Get "/contracts/candidates" impl MarketplaceDatabase where requires [Role::Carrier]);
pub async fn contract_candidates<B: MarketplaceDatabase>(
    caller: Caller,
    api: web::Data<ContractApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let candidates = api.candidates(caller.account_id).await?;
    Ok(HttpResponse::Ok().json(candidates))
}

route!(create_contract => Post "/contracts" impl MarketplaceDatabase where requires [Role::Carrier]);
/// Route handler for contract formation
///
/// A 409 response means that one of the orders was claimed by another contract first.
pub async fn create_contract<B: MarketplaceDatabase>(
    caller: Caller,
    body: web::Json<ContractRequest>,
    api: web::Data<ContractApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST contract for {}", caller.account_id);
    let contract = api.create_contract(caller.account_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(contract))
}

route!(my_contracts => Get "/contracts" impl MarketplaceDatabase);
pub async fn my_contracts<B: MarketplaceDatabase>(
    caller: Caller,
    api: web::Data<ContractApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let contracts = api.contracts_for_account(caller.account_id).await?;
    Ok(HttpResponse::Ok().json(contracts))
}

route!(contract_by_number => Get "/contracts/number/{number}" impl MarketplaceDatabase);
pub async fn contract_by_number<B: MarketplaceDatabase>(
    caller: Caller,
    path: web::Path<String>,
    api: web::Data<ContractApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let contract = api.contract_by_number_for_account(caller.account_id, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(contract))
}

route!(contract_by_id => Get "/contracts/{id}" impl MarketplaceDatabase);
pub async fn contract_by_id<B: MarketplaceDatabase>(
    caller: Caller,
    path: web::Path<i64>,
    api: web::Data<ContractApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let contract = api.contract_for_account(caller.account_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(contract))
}

route!(add_cmr_document => Post "/contracts/{id}/cmr" impl MarketplaceDatabase where requires [Role::Carrier]);
pub async fn add_cmr_document<B: MarketplaceDatabase>(
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<NewCmrDocument>,
    api: web::Data<ContractApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let contract_id = path.into_inner();
    debug!("💻️ POST CMR document for contract {contract_id}");
    let document = api.add_cmr_document(caller.account_id, contract_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(document))
}

route!(cmr_documents => Get "/contracts/{id}/cmr" impl MarketplaceDatabase);
pub async fn cmr_documents<B: MarketplaceDatabase>(
    caller: Caller,
    path: web::Path<i64>,
    api: web::Data<ContractApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let documents = api.cmr_documents(caller.account_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(documents))
}

//----------------------------------------------   Warehouse  ----------------------------------------------------
route!(add_stock => Post "/warehouse/stock" impl MarketplaceDatabase where requires [Role::Shipper]);
pub async fn add_stock<B: MarketplaceDatabase>(
    caller: Caller,
    body: web::Json<StockRequest>,
    api: web::Data<WarehouseApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let view = api.add_stock(caller.account_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

route!(warehouse => Get "/warehouse" impl MarketplaceDatabase where requires [Role::Shipper]);
/// Recomputes the caller's stock before returning it.
pub async fn warehouse<B: MarketplaceDatabase>(
    caller: Caller,
    api: web::Data<WarehouseApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let view = api.stock(caller.account_id).await?;
    Ok(HttpResponse::Ok().json(view))
}
