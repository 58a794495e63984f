use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Category, CategoryKind},
    sqlite::db::items::id_list_query,
};

pub async fn insert_category(
    kind: CategoryKind,
    name: &str,
    description: Option<String>,
    conn: &mut SqliteConnection,
) -> Result<Category, sqlx::Error> {
    let sql = format!("INSERT INTO {} (name, description) VALUES ($1, $2) RETURNING *", kind.table());
    let category: Category = sqlx::query_as(&sql).bind(name.trim()).bind(description).fetch_one(conn).await?;
    debug!("🗃️ {kind} category '{}' inserted with id {}", category.name, category.id);
    Ok(category)
}

pub async fn fetch_categories(kind: CategoryKind, conn: &mut SqliteConnection) -> Result<Vec<Category>, sqlx::Error> {
    let sql = format!("SELECT * FROM {} ORDER BY name", kind.table());
    let categories = sqlx::query_as(&sql).fetch_all(conn).await?;
    Ok(categories)
}

pub async fn fetch_categories_by_id(
    kind: CategoryKind,
    ids: &[i64],
    conn: &mut SqliteConnection,
) -> Result<Vec<Category>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let prefix = format!("SELECT * FROM {} WHERE id IN (", kind.table());
    let mut builder = id_list_query(&prefix, ids);
    builder.push(" ORDER BY name");
    let categories = builder.build_query_as().fetch_all(conn).await?;
    Ok(categories)
}
