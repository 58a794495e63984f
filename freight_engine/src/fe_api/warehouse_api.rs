use std::fmt::Debug;

use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{VirtualWarehouse, WarehouseStock},
    fe_api::profiles::shipper_profile,
    traits::{MarketplaceDatabase, MarketplaceError, ValidationError},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRequest {
    pub item_id: i64,
    /// Kilograms
    pub initial_quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseView {
    pub warehouse: VirtualWarehouse,
    pub stock: Vec<WarehouseStock>,
}

/// Maintains the virtual warehouse of each shipper.
///
/// Available quantities are never edited directly. They are recomputed from the initial quantities and the cargo
/// orders whenever stock is added, an order is created, or the warehouse is viewed.
pub struct WarehouseApi<B> {
    db: B,
}

impl<B: Debug> Debug for WarehouseApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WarehouseApi ({:?})", self.db)
    }
}

impl<B> WarehouseApi<B>
where B: MarketplaceDatabase
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Creates or replaces the stock line for one of the shipper's cargo items, and returns the recomputed warehouse.
    pub async fn add_stock(&self, account_id: i64, request: StockRequest) -> Result<WarehouseView, MarketplaceError> {
        if request.initial_quantity.is_nan() || request.initial_quantity < 0.0 {
            return Err(ValidationError::field("initial_quantity", "Quantity cannot be negative.").into());
        }
        let profile = shipper_profile(&self.db, account_id).await?;
        let owned = self.db.fetch_cargo_items(&[request.item_id]).await?.iter().any(|i| i.shipper_id == profile.id);
        if !owned {
            return Err(ValidationError::field("item_id", "Select a cargo item from your own catalogue.").into());
        }
        let warehouse = self.db.fetch_warehouse(profile.id).await?.ok_or(MarketplaceError::WarehouseNotFound(profile.id))?;
        self.db.upsert_stock_line(warehouse.id, request.item_id, request.initial_quantity).await?;
        debug!(
            "🔄️ Stock line for item #{} in warehouse #{} set to {}kg",
            request.item_id, warehouse.id, request.initial_quantity
        );
        let stock = self.db.recompute_stock(profile.id).await?;
        Ok(WarehouseView { warehouse, stock })
    }

    /// Recomputes the shipper's stock and returns the warehouse with its stock lines.
    pub async fn stock(&self, account_id: i64) -> Result<WarehouseView, MarketplaceError> {
        let profile = shipper_profile(&self.db, account_id).await?;
        let warehouse = self.db.fetch_warehouse(profile.id).await?.ok_or(MarketplaceError::WarehouseNotFound(profile.id))?;
        self.db.recompute_stock(profile.id).await?;
        let stock = self.db.fetch_stock(profile.id).await?;
        Ok(WarehouseView { warehouse, stock })
    }

    pub async fn recompute(&self, account_id: i64) -> Result<Vec<WarehouseStock>, MarketplaceError> {
        let profile = shipper_profile(&self.db, account_id).await?;
        self.db.recompute_stock(profile.id).await
    }
}
