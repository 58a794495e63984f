use chrono::{DateTime, Utc};
use freight_common::{Money, Point, RouteOption};
use log::{debug, trace};
use sqlx::{types::Json, FromRow, QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewTransportOrder, TransportOrder},
    order_objects::TransportOrderQuery,
    sqlite::db::ids_matching_text,
};

const SELECT_TRANSPORT_ORDERS: &str = r#"
    SELECT t.*, sc.id AS contract_id
    FROM transport_orders t
        LEFT JOIN shipment_contracts sc ON sc.transport_order_id = t.id
    "#;

#[derive(Debug, FromRow)]
struct TransportOrderRow {
    id: i64,
    carrier_id: i64,
    loading_points: Json<Vec<Point>>,
    unloading_points: Json<Vec<Point>>,
    insurance: bool,
    price: Money,
    route_info: Option<Json<Vec<RouteOption>>>,
    contract_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

async fn hydrate(row: TransportOrderRow, conn: &mut SqliteConnection) -> Result<TransportOrder, sqlx::Error> {
    let transport_item_ids = sqlx::query_scalar::<_, i64>(
        "SELECT transport_item_id FROM transport_order_items WHERE transport_order_id = $1 ORDER BY transport_item_id",
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;
    let category_ids = sqlx::query_scalar::<_, i64>(
        "SELECT category_id FROM transport_order_categories WHERE transport_order_id = $1 ORDER BY category_id",
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(TransportOrder {
        id: row.id,
        carrier_id: row.carrier_id,
        transport_item_ids,
        category_ids,
        loading_points: row.loading_points.0,
        unloading_points: row.unloading_points.0,
        insurance: row.insurance,
        price: row.price,
        route_info: row.route_info.map(|r| r.0),
        contract_id: row.contract_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Inserts the order and its item and category links. Not atomic on its own; embed it in a transaction.
pub async fn insert_transport_order(
    order: NewTransportOrder,
    conn: &mut SqliteConnection,
) -> Result<TransportOrder, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        r#"
            INSERT INTO transport_orders (
                carrier_id,
                loading_points,
                unloading_points,
                insurance,
                price,
                route_info,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id;
        "#,
    )
    .bind(order.carrier_id)
    .bind(Json(&order.loading_points))
    .bind(Json(&order.unloading_points))
    .bind(order.insurance)
    .bind(order.price)
    .bind(order.route_info.as_ref().map(Json))
    .bind(order.created_at)
    .fetch_one(&mut *conn)
    .await?;
    for item_id in &order.transport_item_ids {
        sqlx::query("INSERT INTO transport_order_items (transport_order_id, transport_item_id) VALUES ($1, $2)")
            .bind(id)
            .bind(*item_id)
            .execute(&mut *conn)
            .await?;
    }
    for category_id in &order.category_ids {
        sqlx::query("INSERT INTO transport_order_categories (transport_order_id, category_id) VALUES ($1, $2)")
            .bind(id)
            .bind(*category_id)
            .execute(&mut *conn)
            .await?;
    }
    debug!("🗃️ Transport order #{id} inserted for carrier {}", order.carrier_id);
    fetch_transport_order(id, conn).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn fetch_transport_order(
    id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<TransportOrder>, sqlx::Error> {
    let sql = format!("{SELECT_TRANSPORT_ORDERS} WHERE t.id = $1");
    let row: Option<TransportOrderRow> = sqlx::query_as(&sql).bind(id).fetch_optional(&mut *conn).await?;
    match row {
        Some(row) => Ok(Some(hydrate(row, conn).await?)),
        None => Ok(None),
    }
}

pub async fn search_transport_orders(
    query: TransportOrderQuery,
    conn: &mut SqliteConnection,
) -> Result<Vec<TransportOrder>, sqlx::Error> {
    trace!("🗃️ Searching transport orders. {query}");
    let matching_items = match query.text() {
        Some(q) => {
            let rows = sqlx::query_as("SELECT id, trailer_number FROM transport_items").fetch_all(&mut *conn).await?;
            let ids = ids_matching_text(rows, q);
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            Some(ids)
        },
        None => None,
    };
    let mut builder = QueryBuilder::new(SELECT_TRANSPORT_ORDERS);
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(item_ids) = &matching_items {
        where_clause.push("t.id IN (SELECT transport_order_id FROM transport_order_items WHERE transport_item_id IN (");
        for (i, item_id) in item_ids.iter().enumerate() {
            if i > 0 {
                where_clause.push_unseparated(", ");
            }
            where_clause.push_bind_unseparated(*item_id);
        }
        where_clause.push_unseparated("))");
    }
    if let Some(transport_type) = query.transport_type {
        where_clause.push(
            "t.id IN (SELECT toi.transport_order_id FROM transport_order_items toi JOIN transport_items ti ON ti.id = \
             toi.transport_item_id WHERE ti.trailer_type = ",
        );
        where_clause.push_bind_unseparated(transport_type);
        where_clause.push_unseparated(")");
    }
    if let Some(carrier_id) = query.carrier_id {
        where_clause.push("t.carrier_id = ");
        where_clause.push_bind_unseparated(carrier_id);
    }
    if query.uncontracted_only {
        where_clause.push("sc.id IS NULL");
    }
    builder.push(" ORDER BY t.created_at DESC, t.id DESC");
    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }
    let rows: Vec<TransportOrderRow> = builder.build_query_as().fetch_all(&mut *conn).await?;
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        orders.push(hydrate(row, conn).await?);
    }
    Ok(orders)
}

pub async fn count_transport_orders_for_carrier(
    carrier_id: i64,
    conn: &mut SqliteConnection,
) -> Result<i64, sqlx::Error> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM transport_orders WHERE carrier_id = $1")
        .bind(carrier_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}
