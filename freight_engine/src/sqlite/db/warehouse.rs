use std::collections::HashMap;

use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{VirtualWarehouse, WarehouseStock};

pub async fn insert_warehouse(shipper_id: i64, conn: &mut SqliteConnection) -> Result<VirtualWarehouse, sqlx::Error> {
    let warehouse = sqlx::query_as("INSERT INTO virtual_warehouses (shipper_id) VALUES ($1) RETURNING *")
        .bind(shipper_id)
        .fetch_one(conn)
        .await?;
    Ok(warehouse)
}

pub async fn fetch_warehouse(
    shipper_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<VirtualWarehouse>, sqlx::Error> {
    let warehouse = sqlx::query_as("SELECT * FROM virtual_warehouses WHERE shipper_id = $1")
        .bind(shipper_id)
        .fetch_optional(conn)
        .await?;
    Ok(warehouse)
}

/// Creates the stock line, or replaces the initial quantity of an existing one. Available quantity is left for the
/// next recompute, except on a brand-new line where it starts equal to the initial quantity.
pub async fn upsert_stock_line(
    warehouse_id: i64,
    item_id: i64,
    initial_quantity: f64,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO warehouse_stock (warehouse_id, item_id, initial_quantity, available_quantity)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (warehouse_id, item_id) DO UPDATE SET initial_quantity = excluded.initial_quantity
        "#,
    )
    .bind(warehouse_id)
    .bind(item_id)
    .bind(initial_quantity)
    .execute(conn)
    .await?;
    trace!("🗃️ Stock line for item {item_id} in warehouse {warehouse_id} set to {initial_quantity}kg");
    Ok(())
}

pub async fn fetch_stock(shipper_id: i64, conn: &mut SqliteConnection) -> Result<Vec<WarehouseStock>, sqlx::Error> {
    let stock = sqlx::query_as(
        r#"
            SELECT
                ws.id,
                ws.warehouse_id,
                ws.item_id,
                ci.name AS item_name,
                ws.initial_quantity,
                ws.available_quantity
            FROM warehouse_stock ws
                JOIN virtual_warehouses vw ON vw.id = ws.warehouse_id
                JOIN cargo_items ci ON ci.id = ws.item_id
            WHERE vw.shipper_id = $1
            ORDER BY ci.name, ws.id
        "#,
    )
    .bind(shipper_id)
    .fetch_all(conn)
    .await?;
    Ok(stock)
}

/// The total cargo item weight per item id across all cargo orders of the shipper.
pub async fn committed_weights(
    shipper_id: i64,
    conn: &mut SqliteConnection,
) -> Result<HashMap<i64, f64>, sqlx::Error> {
    let rows: Vec<(i64, f64)> = sqlx::query_as(
        r#"
            SELECT coi.cargo_item_id, TOTAL(ci.weight)
            FROM cargo_order_items coi
                JOIN cargo_orders co ON co.id = coi.cargo_order_id
                JOIN cargo_items ci ON ci.id = coi.cargo_item_id
            WHERE co.shipper_id = $1
            GROUP BY coi.cargo_item_id
        "#,
    )
    .bind(shipper_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().collect())
}

pub async fn set_available_quantity(
    stock_id: i64,
    available_quantity: f64,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE warehouse_stock SET available_quantity = $1 WHERE id = $2")
        .bind(available_quantity)
        .bind(stock_id)
        .execute(conn)
        .await?;
    Ok(())
}
