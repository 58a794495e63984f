//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are simple functions (rather than stateful structs) that accept a `&mut SqliteConnection`
//! argument. Callers can obtain a connection from a pool, or open a transaction when several writes must land
//! together, and call through to the functions without any other changes.
use std::{env, str::FromStr};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod accounts;
pub mod cargo_orders;
pub mod categories;
pub mod cmr;
pub mod contracts;
pub mod items;
pub mod transport_orders;
pub mod warehouse;

const SQLITE_DB_URL: &str = "sqlite://data/freight_match.db";

pub fn db_url() -> String {
    let result = env::var("FMS_DATABASE_URL").unwrap_or_else(|_| {
        info!("🗃️ FMS_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("🗃️ Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true).foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}

/// If `e` is a UNIQUE constraint violation, returns the name of the (first) offending column.
///
/// SQLite reports these as `UNIQUE constraint failed: table.column[, table.column]`.
pub fn unique_violation_column(e: &SqlxError) -> Option<String> {
    match e {
        SqlxError::Database(db_err) if db_err.is_unique_violation() => {
            let message = db_err.message();
            let columns = message.split_once(": ").map(|(_, cols)| cols).unwrap_or(message);
            let first = columns.split(", ").next()?;
            let column = first.rsplit('.').next().unwrap_or(first);
            Some(column.trim().to_string())
        },
        _ => None,
    }
}

/// True if `text` contains `needle`, ignoring case. Case folding is Unicode-aware, unlike SQLite's `LIKE`.
pub fn contains_text(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(&needle.to_lowercase())
}

/// The ids of the `(id, text)` rows whose text contains `needle`, ignoring case.
pub fn ids_matching_text(rows: Vec<(i64, String)>, needle: &str) -> Vec<i64> {
    rows.into_iter().filter(|(_, text)| contains_text(text, needle)).map(|(id, _)| id).collect()
}

#[cfg(test)]
mod test {
    use super::{contains_text, ids_matching_text};

    #[test]
    fn text_matching_ignores_case() {
        assert!(contains_text("Wheat flour", "FLOUR"));
        assert!(contains_text("Timber 50%", "50%"));
        assert!(contains_text("Мука пшеничная", "МУКА"));
        assert!(contains_text("ТР-001", "тр-0"));
        assert!(!contains_text("Rye", "flour"));
    }

    #[test]
    fn matching_ids_keep_row_order() {
        let rows = vec![(3, "Öl".to_string()), (1, "Salt".to_string()), (2, "öl fass".to_string())];
        assert_eq!(ids_matching_text(rows, "ÖL"), vec![3, 2]);
    }
}
