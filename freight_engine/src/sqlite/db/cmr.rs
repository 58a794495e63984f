use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::CmrDocument;

pub async fn insert_cmr_document(
    contract_id: i64,
    file_path: &str,
    generated_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<CmrDocument, sqlx::Error> {
    let document: CmrDocument = sqlx::query_as(
        "INSERT INTO cmr_documents (contract_id, file_path, generated_at) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(contract_id)
    .bind(file_path)
    .bind(generated_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ CMR document #{} recorded for contract {contract_id}", document.id);
    Ok(document)
}

pub async fn fetch_cmr_documents(
    contract_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<CmrDocument>, sqlx::Error> {
    let documents = sqlx::query_as(
        "SELECT * FROM cmr_documents WHERE contract_id = $1 ORDER BY generated_at DESC, id DESC",
    )
    .bind(contract_id)
    .fetch_all(conn)
    .await?;
    Ok(documents)
}
