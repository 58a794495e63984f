use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{ContractNumber, NewContract, ShipmentContract},
    sqlite::db::unique_violation_column,
    traits::MarketplaceError,
};

/// Inserts the contract row. The UNIQUE constraints on both order columns make this the atomic claim on the orders;
/// violations are translated into the matching "already in a contract" error.
///
/// This should be the first write of its transaction, so that concurrent claims queue on the write lock and the loser
/// sees the winner's row instead of a stale snapshot.
pub async fn insert_contract(
    contract: &NewContract,
    conn: &mut SqliteConnection,
) -> Result<ShipmentContract, MarketplaceError> {
    let result = sqlx::query_as::<_, ShipmentContract>(
        r#"
            INSERT INTO shipment_contracts (
                cargo_order_id,
                transport_order_id,
                contract_number,
                price,
                payment_deadline,
                delivery_deadline,
                accepted,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *;
        "#,
    )
    .bind(contract.cargo_order_id)
    .bind(contract.transport_order_id)
    .bind(&contract.contract_number)
    .bind(contract.price)
    .bind(contract.payment_deadline)
    .bind(contract.delivery_deadline)
    .bind(contract.accepted)
    .bind(contract.created_at)
    .fetch_one(conn)
    .await;
    match result {
        Ok(contract) => {
            debug!("🗃️ Contract {} inserted with id {}", contract.contract_number, contract.id);
            Ok(contract)
        },
        Err(e) => Err(match unique_violation_column(&e).as_deref() {
            Some("transport_order_id") => MarketplaceError::TransportOrderAlreadyContracted(contract.transport_order_id),
            Some("cargo_order_id") => MarketplaceError::CargoOrderAlreadyContracted(contract.cargo_order_id),
            Some("contract_number") => MarketplaceError::ContractNumberCollision(contract.contract_number.to_string()),
            _ => e.into(),
        }),
    }
}

pub async fn fetch_contract(id: i64, conn: &mut SqliteConnection) -> Result<Option<ShipmentContract>, sqlx::Error> {
    let contract =
        sqlx::query_as("SELECT * FROM shipment_contracts WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(contract)
}

pub async fn fetch_contract_by_number(
    number: &ContractNumber,
    conn: &mut SqliteConnection,
) -> Result<Option<ShipmentContract>, sqlx::Error> {
    let contract = sqlx::query_as("SELECT * FROM shipment_contracts WHERE contract_number = $1")
        .bind(number.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(contract)
}

pub async fn fetch_contracts_for_carrier(
    carrier_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<ShipmentContract>, sqlx::Error> {
    let contracts = sqlx::query_as(
        r#"
            SELECT sc.*
            FROM shipment_contracts sc
                JOIN transport_orders t ON t.id = sc.transport_order_id
            WHERE t.carrier_id = $1
            ORDER BY sc.created_at DESC, sc.id DESC
        "#,
    )
    .bind(carrier_id)
    .fetch_all(conn)
    .await?;
    Ok(contracts)
}

pub async fn fetch_contracts_for_shipper(
    shipper_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<ShipmentContract>, sqlx::Error> {
    let contracts = sqlx::query_as(
        r#"
            SELECT sc.*
            FROM shipment_contracts sc
                JOIN cargo_orders co ON co.id = sc.cargo_order_id
            WHERE co.shipper_id = $1
            ORDER BY sc.created_at DESC, sc.id DESC
        "#,
    )
    .bind(shipper_id)
    .fetch_all(conn)
    .await?;
    Ok(contracts)
}
