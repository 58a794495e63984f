//! Cargo and transport order workflows.
//!
//! Creating an order is the only place where the marketplace depends on geodata for correctness. Both addresses must
//! resolve before anything is written; routes are stored if the routing service returns any, and omitted otherwise.
use std::{collections::BTreeSet, fmt::Debug};

use chrono::Utc;
use freight_common::{Point, RouteOption};
use futures_util::future::join;
use log::*;

use crate::{
    db_types::{CargoOrder, CategoryKind, NewCargoOrder, NewTransportOrder, Role, TransportOrder},
    fe_api::{
        account_objects::{Dashboard, DASHBOARD_ORDER_COUNT},
        profiles::{carrier_profile, shipper_profile},
        route_objects::{CargoOrderRoute, RouteEstimate, RoutePreview},
    },
    order_objects::{CargoOrderQuery, CargoOrderRequest, TransportOrderQuery, TransportOrderRequest},
    traits::{AccountApiError, Geocoder, MarketplaceDatabase, MarketplaceError, ValidationError},
};

pub struct OrderFlowApi<B, G> {
    db: B,
    geocoder: G,
}

impl<B: Debug, G> Debug for OrderFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.db)
    }
}

/// The resolved end points of an order and whatever routes were found between them.
struct ResolvedRoute {
    loading: Point,
    unloading: Point,
    routes: Option<Vec<RouteOption>>,
}

impl<B, G> OrderFlowApi<B, G>
where
    B: MarketplaceDatabase,
    G: Geocoder,
{
    pub fn new(db: B, geocoder: G) -> Self {
        Self { db, geocoder }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Creates a cargo order for the shipper behind `account_id`.
    ///
    /// The request is checked in full before the geocoder is consulted. On success the shipper's warehouse stock is
    /// recomputed. A failed recompute is logged but does not affect the order.
    pub async fn create_cargo_order(
        &self,
        account_id: i64,
        request: CargoOrderRequest,
    ) -> Result<CargoOrder, MarketplaceError> {
        request.validate()?;
        let profile = shipper_profile(&self.db, account_id).await?;
        let item_ids = unique_ids(&request.cargo_items);
        let items = self.db.fetch_cargo_items(&item_ids).await?;
        if items.len() != item_ids.len() || items.iter().any(|i| i.shipper_id != profile.id) {
            return Err(ValidationError::field("cargo_items", "Select cargo items from your own catalogue.").into());
        }
        let category_ids = self.check_categories(CategoryKind::Cargo, &request.categories).await?;
        let route = self.resolve_route(&request.loading_address, &request.unloading_address).await?;
        let order = NewCargoOrder {
            shipper_id: profile.id,
            cargo_item_ids: item_ids,
            category_ids,
            loading_points: vec![route.loading],
            unloading_points: vec![route.unloading],
            insurance: request.insurance,
            price: request.price,
            trailer_type: request.trailer_type,
            route_info: route.routes,
            created_at: Utc::now(),
        };
        let order = self.db.insert_cargo_order(order).await?;
        info!("🔄️ Shipper {} created cargo order #{}", profile.id, order.id);
        if let Err(e) = self.db.recompute_stock(profile.id).await {
            error!("🔄️ Could not recompute warehouse stock for shipper {} after cargo order #{}: {e}", profile.id, order.id);
        }
        Ok(order)
    }

    /// Creates a transport order for the carrier behind `account_id`.
    pub async fn create_transport_order(
        &self,
        account_id: i64,
        request: TransportOrderRequest,
    ) -> Result<TransportOrder, MarketplaceError> {
        request.validate()?;
        let profile = carrier_profile(&self.db, account_id).await?;
        let item_ids = unique_ids(&request.transport_items);
        let items = self.db.fetch_transport_items(&item_ids).await?;
        if items.len() != item_ids.len() || items.iter().any(|i| i.carrier_id != profile.id) {
            return Err(ValidationError::field("transport_items", "Select transport units from your own fleet.").into());
        }
        let category_ids = self.check_categories(CategoryKind::Transport, &request.categories).await?;
        let route = self.resolve_route(&request.loading_address, &request.unloading_address).await?;
        let order = NewTransportOrder {
            carrier_id: profile.id,
            transport_item_ids: item_ids,
            category_ids,
            loading_points: vec![route.loading],
            unloading_points: vec![route.unloading],
            insurance: request.insurance,
            price: request.price,
            route_info: route.routes,
            created_at: Utc::now(),
        };
        let order = self.db.insert_transport_order(order).await?;
        info!("🔄️ Carrier {} created transport order #{}", profile.id, order.id);
        Ok(order)
    }

    pub async fn cargo_order(&self, id: i64) -> Result<CargoOrder, MarketplaceError> {
        self.db.fetch_cargo_order(id).await?.ok_or(MarketplaceError::CargoOrderNotFound(id))
    }

    pub async fn transport_order(&self, id: i64) -> Result<TransportOrder, MarketplaceError> {
        self.db.fetch_transport_order(id).await?.ok_or(MarketplaceError::TransportOrderNotFound(id))
    }

    pub async fn search_cargo_orders(&self, query: CargoOrderQuery) -> Result<Vec<CargoOrder>, MarketplaceError> {
        trace!("🔄️ Cargo order search. {query}");
        self.db.search_cargo_orders(query).await
    }

    pub async fn search_transport_orders(
        &self,
        query: TransportOrderQuery,
    ) -> Result<Vec<TransportOrder>, MarketplaceError> {
        trace!("🔄️ Transport order search. {query}");
        self.db.search_transport_orders(query).await
    }

    /// The stored route of a cargo order with travel time and fuel estimates. Nothing is fetched from the geocoder.
    pub async fn cargo_order_route(&self, id: i64) -> Result<CargoOrderRoute, MarketplaceError> {
        let order = self.cargo_order(id).await?;
        let estimate = RouteEstimate::for_routes(order.route_info.as_deref());
        Ok(CargoOrderRoute {
            order_id: order.id,
            loading_points: order.loading_points,
            unloading_points: order.unloading_points,
            route_info: order.route_info,
            estimate,
        })
    }

    /// Looks up both addresses and, if both resolve, the routes between them. Unresolved parts are left empty.
    pub async fn route_preview(&self, start_address: &str, end_address: &str) -> RoutePreview {
        let (start, end) =
            join(self.geocoder.resolve_address(start_address), self.geocoder.resolve_address(end_address)).await;
        let routes = match (start, end) {
            (Some(s), Some(e)) => self.geocoder.fetch_routes(s, e).await,
            _ => None,
        };
        RoutePreview { start, end, routes }
    }

    /// The role-specific dashboard: the profile, the most recent own orders and the total number of own orders.
    pub async fn dashboard(&self, account_id: i64) -> Result<Dashboard, MarketplaceError> {
        let account =
            self.db.fetch_account(account_id).await?.ok_or(AccountApiError::AccountNotFound(account_id))?;
        let dashboard = match account.role {
            Role::Shipper => {
                let profile = shipper_profile(&self.db, account_id).await?;
                let query =
                    CargoOrderQuery::default().with_shipper_id(profile.id).with_limit(DASHBOARD_ORDER_COUNT);
                let recent_cargo_orders = self.db.search_cargo_orders(query).await?;
                let total_cargo_orders = self.db.count_cargo_orders_for_shipper(profile.id).await?;
                Dashboard::Shipper { profile, recent_cargo_orders, total_cargo_orders }
            },
            Role::Carrier => {
                let profile = carrier_profile(&self.db, account_id).await?;
                let query =
                    TransportOrderQuery::default().with_carrier_id(profile.id).with_limit(DASHBOARD_ORDER_COUNT);
                let recent_transport_orders = self.db.search_transport_orders(query).await?;
                let total_transport_orders = self.db.count_transport_orders_for_carrier(profile.id).await?;
                Dashboard::Carrier { profile, recent_transport_orders, total_transport_orders }
            },
        };
        Ok(dashboard)
    }

    async fn check_categories(&self, kind: CategoryKind, ids: &[i64]) -> Result<Vec<i64>, MarketplaceError> {
        let ids = unique_ids(ids);
        if ids.is_empty() {
            return Ok(ids);
        }
        let found = self.db.fetch_categories_by_id(kind, &ids).await?;
        if found.len() != ids.len() {
            return Err(ValidationError::field("categories", format!("Select valid {kind} categories.")).into());
        }
        Ok(ids)
    }

    async fn resolve_route(&self, loading_address: &str, unloading_address: &str) -> Result<ResolvedRoute, MarketplaceError> {
        let (loading, unloading) = join(
            self.geocoder.resolve_address(loading_address),
            self.geocoder.resolve_address(unloading_address),
        )
        .await;
        let Some(loading) = loading else {
            debug!("🔄️ Loading address '{loading_address}' could not be resolved");
            return Err(ValidationError::field("loading_address", "Could not find coordinates for this address.").into());
        };
        let Some(unloading) = unloading else {
            debug!("🔄️ Unloading address '{unloading_address}' could not be resolved");
            return Err(
                ValidationError::field("unloading_address", "Could not find coordinates for this address.").into()
            );
        };
        let routes = self.geocoder.fetch_routes(loading, unloading).await;
        if routes.is_none() {
            info!("🔄️ No route found between {loading} and {unloading}. The order is stored without route info.");
        }
        Ok(ResolvedRoute {
            loading: Point { city: loading_address.trim().to_string(), coordinates: loading },
            unloading: Point { city: unloading_address.trim().to_string(), coordinates: unloading },
            routes,
        })
    }
}

/// Sorted and deduplicated
fn unique_ids(ids: &[i64]) -> Vec<i64> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}
