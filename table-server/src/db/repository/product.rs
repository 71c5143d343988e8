//! Product Repository (read-only catalog)

use super::RepoResult;
use shared::models::Product;
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, name, category, price, available";

pub async fn find_available(conn: impl SqliteExecutor<'_>) -> RepoResult<Vec<Product>> {
    let sql = format!("SELECT {COLUMNS} FROM product WHERE available = 1 ORDER BY category, name");
    let rows = sqlx::query_as::<_, Product>(&sql).fetch_all(conn).await?;
    Ok(rows)
}

/// Current price and availability, re-read at order time
pub async fn find_by_id(conn: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("SELECT {COLUMNS} FROM product WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}
