use chrono::{DateTime, Utc};
use freight_common::{Money, Point, RouteOption};
use log::{debug, trace};
use sqlx::{types::Json, FromRow, QueryBuilder, SqliteConnection};

use crate::{
    db_types::{CargoOrder, NewCargoOrder, TrailerType},
    order_objects::CargoOrderQuery,
    sqlite::db::ids_matching_text,
};

const SELECT_CARGO_ORDERS: &str = r#"
    SELECT co.*, sc.id AS contract_id
    FROM cargo_orders co
        LEFT JOIN shipment_contracts sc ON sc.cargo_order_id = co.id
    "#;

#[derive(Debug, FromRow)]
struct CargoOrderRow {
    id: i64,
    shipper_id: i64,
    loading_points: Json<Vec<Point>>,
    unloading_points: Json<Vec<Point>>,
    insurance: bool,
    price: Money,
    trailer_type: Option<TrailerType>,
    route_info: Option<Json<Vec<RouteOption>>>,
    is_accepted: bool,
    carrier_id: Option<i64>,
    contract_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CargoOrderRow {
    fn into_order(self, cargo_item_ids: Vec<i64>, category_ids: Vec<i64>) -> CargoOrder {
        CargoOrder {
            id: self.id,
            shipper_id: self.shipper_id,
            cargo_item_ids,
            category_ids,
            loading_points: self.loading_points.0,
            unloading_points: self.unloading_points.0,
            insurance: self.insurance,
            price: self.price,
            trailer_type: self.trailer_type,
            route_info: self.route_info.map(|r| r.0),
            is_accepted: self.is_accepted,
            carrier_id: self.carrier_id,
            contract_id: self.contract_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Loads the item and category links for a row.
async fn hydrate(row: CargoOrderRow, conn: &mut SqliteConnection) -> Result<CargoOrder, sqlx::Error> {
    let item_ids = sqlx::query_scalar::<_, i64>(
        "SELECT cargo_item_id FROM cargo_order_items WHERE cargo_order_id = $1 ORDER BY cargo_item_id",
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;
    let category_ids = sqlx::query_scalar::<_, i64>(
        "SELECT category_id FROM cargo_order_categories WHERE cargo_order_id = $1 ORDER BY category_id",
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(row.into_order(item_ids, category_ids))
}

/// Inserts the order and its item and category links. This is not atomic on its own. Call it inside a transaction
/// and pass `&mut *tx` as the connection argument.
pub async fn insert_cargo_order(order: NewCargoOrder, conn: &mut SqliteConnection) -> Result<CargoOrder, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        r#"
            INSERT INTO cargo_orders (
                shipper_id,
                loading_points,
                unloading_points,
                insurance,
                price,
                trailer_type,
                route_info,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id;
        "#,
    )
    .bind(order.shipper_id)
    .bind(Json(&order.loading_points))
    .bind(Json(&order.unloading_points))
    .bind(order.insurance)
    .bind(order.price)
    .bind(order.trailer_type)
    .bind(order.route_info.as_ref().map(Json))
    .bind(order.created_at)
    .fetch_one(&mut *conn)
    .await?;
    for item_id in &order.cargo_item_ids {
        sqlx::query("INSERT INTO cargo_order_items (cargo_order_id, cargo_item_id) VALUES ($1, $2)")
            .bind(id)
            .bind(*item_id)
            .execute(&mut *conn)
            .await?;
    }
    for category_id in &order.category_ids {
        sqlx::query("INSERT INTO cargo_order_categories (cargo_order_id, category_id) VALUES ($1, $2)")
            .bind(id)
            .bind(*category_id)
            .execute(&mut *conn)
            .await?;
    }
    debug!("🗃️ Cargo order #{id} inserted for shipper {}", order.shipper_id);
    fetch_cargo_order(id, conn).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn fetch_cargo_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<CargoOrder>, sqlx::Error> {
    let sql = format!("{SELECT_CARGO_ORDERS} WHERE co.id = $1");
    let row: Option<CargoOrderRow> = sqlx::query_as(&sql).bind(id).fetch_optional(&mut *conn).await?;
    match row {
        Some(row) => Ok(Some(hydrate(row, conn).await?)),
        None => Ok(None),
    }
}

pub async fn search_cargo_orders(
    query: CargoOrderQuery,
    conn: &mut SqliteConnection,
) -> Result<Vec<CargoOrder>, sqlx::Error> {
    trace!("🗃️ Searching cargo orders. {query}");
    let matching_items = match query.text() {
        Some(q) => {
            let rows = sqlx::query_as("SELECT id, name FROM cargo_items").fetch_all(&mut *conn).await?;
            let ids = ids_matching_text(rows, q);
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            Some(ids)
        },
        None => None,
    };
    let mut builder = QueryBuilder::new(SELECT_CARGO_ORDERS);
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(item_ids) = &matching_items {
        where_clause.push("co.id IN (SELECT cargo_order_id FROM cargo_order_items WHERE cargo_item_id IN (");
        for (i, item_id) in item_ids.iter().enumerate() {
            if i > 0 {
                where_clause.push_unseparated(", ");
            }
            where_clause.push_bind_unseparated(*item_id);
        }
        where_clause.push_unseparated("))");
    }
    if let Some(category) = query.category {
        where_clause.push("co.id IN (SELECT cargo_order_id FROM cargo_order_categories WHERE category_id = ");
        where_clause.push_bind_unseparated(category);
        where_clause.push_unseparated(")");
    }
    if let Some(shipper_id) = query.shipper_id {
        where_clause.push("co.shipper_id = ");
        where_clause.push_bind_unseparated(shipper_id);
    }
    if query.uncontracted_only {
        where_clause.push("sc.id IS NULL");
    }
    builder.push(" ORDER BY co.created_at DESC, co.id DESC");
    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }
    let rows: Vec<CargoOrderRow> = builder.build_query_as().fetch_all(&mut *conn).await?;
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        orders.push(hydrate(row, conn).await?);
    }
    Ok(orders)
}

pub async fn count_cargo_orders_for_shipper(shipper_id: i64, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM cargo_orders WHERE shipper_id = $1")
        .bind(shipper_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

/// Records that the order has been taken by `carrier_id`.
pub async fn mark_accepted(
    id: i64,
    carrier_id: i64,
    updated_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    let result = sqlx::query("UPDATE cargo_orders SET is_accepted = 1, carrier_id = $1, updated_at = $2 WHERE id = $3")
        .bind(carrier_id)
        .bind(updated_at)
        .bind(id)
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    debug!("🗃️ Cargo order #{id} accepted by carrier {carrier_id}");
    Ok(())
}
