use log::debug;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{CargoItem, NewCargoItem, NewTransportItem, TransportItem},
    sqlite::db::unique_violation_column,
    traits::{MarketplaceError, ValidationError},
};

//--------------------------------------     Cargo items     ---------------------------------------------------------
pub async fn insert_cargo_item(
    shipper_id: i64,
    item: NewCargoItem,
    conn: &mut SqliteConnection,
) -> Result<CargoItem, sqlx::Error> {
    let item: CargoItem = sqlx::query_as(
        r#"
            INSERT INTO cargo_items (
                shipper_id,
                name,
                volume,
                weight,
                on_pallets,
                number_of_pallets,
                packaging,
                storage_conditions,
                transport_conditions
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(shipper_id)
    .bind(item.name.trim())
    .bind(item.volume)
    .bind(item.weight)
    .bind(item.on_pallets)
    .bind(item.number_of_pallets)
    .bind(item.packaging)
    .bind(item.storage_conditions)
    .bind(item.transport_conditions)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Cargo item '{}' inserted with id {}", item.name, item.id);
    Ok(item)
}

pub async fn fetch_cargo_items_for_shipper(
    shipper_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<CargoItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM cargo_items WHERE shipper_id = $1 ORDER BY name, id")
        .bind(shipper_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

pub async fn fetch_cargo_items(ids: &[i64], conn: &mut SqliteConnection) -> Result<Vec<CargoItem>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = id_list_query("SELECT * FROM cargo_items WHERE id IN (", ids);
    builder.push(" ORDER BY id");
    let items = builder.build_query_as().fetch_all(conn).await?;
    Ok(items)
}

//--------------------------------------   Transport items   ---------------------------------------------------------
/// Inserts a transport item. Duplicate licences and plates are reported as field-level validation errors.
pub async fn insert_transport_item(
    carrier_id: i64,
    item: NewTransportItem,
    conn: &mut SqliteConnection,
) -> Result<TransportItem, MarketplaceError> {
    let result = sqlx::query_as::<_, TransportItem>(
        r#"
            INSERT INTO transport_items (
                carrier_id,
                driver_license,
                truck_number,
                trailer_number,
                trailer_type
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(carrier_id)
    .bind(item.driver_license.trim())
    .bind(item.truck_number.trim())
    .bind(item.trailer_number.trim())
    .bind(item.trailer_type)
    .fetch_one(conn)
    .await;
    match result {
        Ok(item) => {
            debug!("🗃️ Transport item '{}' inserted with id {}", item.truck_number, item.id);
            Ok(item)
        },
        Err(e) => match unique_violation_column(&e) {
            Some(column) => {
                let message = format!("A transport item with this {} already exists.", column.replace('_', " "));
                Err(ValidationError::field(column, message).into())
            },
            None => Err(e.into()),
        },
    }
}

pub async fn fetch_transport_items_for_carrier(
    carrier_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<TransportItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM transport_items WHERE carrier_id = $1 ORDER BY truck_number, id")
        .bind(carrier_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

pub async fn fetch_transport_items(
    ids: &[i64],
    conn: &mut SqliteConnection,
) -> Result<Vec<TransportItem>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = id_list_query("SELECT * FROM transport_items WHERE id IN (", ids);
    builder.push(" ORDER BY id");
    let items = builder.build_query_as().fetch_all(conn).await?;
    Ok(items)
}

/// Starts a query of the form `{prefix}?, ?, ?)`, binding each id.
pub(crate) fn id_list_query<'a>(prefix: &str, ids: &[i64]) -> QueryBuilder<'a, Sqlite> {
    let mut builder = QueryBuilder::new(prefix);
    let mut list = builder.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
    list.push_unseparated(")");
    builder
}
