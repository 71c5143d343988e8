//! Branch Repository

use super::RepoResult;
use shared::models::Branch;
use sqlx::SqliteExecutor;

pub async fn find_all(conn: impl SqliteExecutor<'_>) -> RepoResult<Vec<Branch>> {
    let rows = sqlx::query_as::<_, Branch>("SELECT id, name FROM branch ORDER BY id")
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(conn: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Branch>> {
    let row = sqlx::query_as::<_, Branch>("SELECT id, name FROM branch WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}
