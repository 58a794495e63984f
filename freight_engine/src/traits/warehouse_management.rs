use crate::{
    db_types::{VirtualWarehouse, WarehouseStock},
    traits::MarketplaceError,
};

/// Storage for the per-shipper virtual warehouse.
///
/// Available quantities are derived data. The authoritative inputs are each stock line's initial quantity and the
/// weights of the cargo items referenced by the shipper's cargo orders.
#[allow(async_fn_in_trait)]
pub trait WarehouseManagement {
    /// The warehouse belonging to the shipper profile `shipper_id`, if one exists.
    async fn fetch_warehouse(&self, shipper_id: i64) -> Result<Option<VirtualWarehouse>, MarketplaceError>;

    /// Creates the stock line for `item_id` in the warehouse, or replaces its initial quantity if the line exists.
    async fn upsert_stock_line(
        &self,
        warehouse_id: i64,
        item_id: i64,
        initial_quantity: f64,
    ) -> Result<(), MarketplaceError>;

    /// Recomputes `available = max(initial - committed, 0)` for every stock line of the shipper's warehouse, where
    /// `committed` is the total weight of the item across the shipper's cargo orders. All lines are rewritten in one
    /// transaction. Returns the updated lines.
    async fn recompute_stock(&self, shipper_id: i64) -> Result<Vec<WarehouseStock>, MarketplaceError>;

    /// The current stock lines of the shipper's warehouse, with item names, ordered by item name.
    async fn fetch_stock(&self, shipper_id: i64) -> Result<Vec<WarehouseStock>, MarketplaceError>;
}
