use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Account, CarrierProfile, NewAccount, ShipperProfile},
    traits::ProfileCoordinates,
};

/// Inserts the account row only. Callers are expected to create the profile in the same transaction.
pub async fn insert_account(
    account: &NewAccount,
    created_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Account, sqlx::Error> {
    let account: Account = sqlx::query_as(
        r#"
            INSERT INTO accounts (
                username,
                email,
                role,
                company_name,
                address,
                vat_number,
                phone_number,
                contact_person,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(&account.username)
    .bind(&account.email)
    .bind(account.role)
    .bind(&account.company_name)
    .bind(&account.address)
    .bind(&account.vat_number)
    .bind(&account.phone_number)
    .bind(&account.contact_person)
    .bind(created_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Account '{}' inserted with id {}", account.username, account.id);
    Ok(account)
}

pub async fn insert_shipper_profile(
    account: &Account,
    warehouse_address: Option<&str>,
    coordinates: ProfileCoordinates,
    conn: &mut SqliteConnection,
) -> Result<ShipperProfile, sqlx::Error> {
    let profile: ShipperProfile = sqlx::query_as(
        r#"
            INSERT INTO shipper_profiles (
                account_id,
                legal_address,
                legal_address_latitude,
                legal_address_longitude,
                warehouse_address,
                warehouse_latitude,
                warehouse_longitude,
                contact_person,
                phone_number,
                email,
                vat_number
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *;
        "#,
    )
    .bind(account.id)
    .bind(&account.address)
    .bind(coordinates.legal.map(|c| c.latitude))
    .bind(coordinates.legal.map(|c| c.longitude))
    .bind(warehouse_address)
    .bind(coordinates.warehouse.map(|c| c.latitude))
    .bind(coordinates.warehouse.map(|c| c.longitude))
    .bind(&account.contact_person)
    .bind(&account.phone_number)
    .bind(&account.email)
    .bind(&account.vat_number)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Shipper profile #{} created for account {}", profile.id, account.id);
    Ok(profile)
}

pub async fn insert_carrier_profile(
    account: &Account,
    coordinates: ProfileCoordinates,
    conn: &mut SqliteConnection,
) -> Result<CarrierProfile, sqlx::Error> {
    let profile: CarrierProfile = sqlx::query_as(
        r#"
            INSERT INTO carrier_profiles (
                account_id,
                legal_address,
                legal_address_latitude,
                legal_address_longitude,
                contact_person,
                phone_number,
                email,
                vat_number
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *;
        "#,
    )
    .bind(account.id)
    .bind(&account.address)
    .bind(coordinates.legal.map(|c| c.latitude))
    .bind(coordinates.legal.map(|c| c.longitude))
    .bind(&account.contact_person)
    .bind(&account.phone_number)
    .bind(&account.email)
    .bind(&account.vat_number)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Carrier profile #{} created for account {}", profile.id, account.id);
    Ok(profile)
}

pub async fn fetch_account(account_id: i64, conn: &mut SqliteConnection) -> Result<Option<Account>, sqlx::Error> {
    let account = sqlx::query_as("SELECT * FROM accounts WHERE id = $1").bind(account_id).fetch_optional(conn).await?;
    Ok(account)
}

pub async fn fetch_account_by_username(
    username: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Account>, sqlx::Error> {
    let account =
        sqlx::query_as("SELECT * FROM accounts WHERE username = $1").bind(username).fetch_optional(conn).await?;
    Ok(account)
}

pub async fn fetch_shipper_profile(
    account_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<ShipperProfile>, sqlx::Error> {
    let profile = sqlx::query_as("SELECT * FROM shipper_profiles WHERE account_id = $1")
        .bind(account_id)
        .fetch_optional(conn)
        .await?;
    Ok(profile)
}

pub async fn fetch_carrier_profile(
    account_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CarrierProfile>, sqlx::Error> {
    let profile = sqlx::query_as("SELECT * FROM carrier_profiles WHERE account_id = $1")
        .bind(account_id)
        .fetch_optional(conn)
        .await?;
    Ok(profile)
}
