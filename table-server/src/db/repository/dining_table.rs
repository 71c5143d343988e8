//! Dining Table Repository

use super::{RepoResult, ensure_affected};
use shared::models::DiningTable;
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, branch_id, capacity, available";

pub async fn find_all(conn: impl SqliteExecutor<'_>) -> RepoResult<Vec<DiningTable>> {
    let sql = format!("SELECT {COLUMNS} FROM dining_table ORDER BY branch_id, id");
    let rows = sqlx::query_as::<_, DiningTable>(&sql).fetch_all(conn).await?;
    Ok(rows)
}

pub async fn find_by_branch(conn: impl SqliteExecutor<'_>, branch_id: i64) -> RepoResult<Vec<DiningTable>> {
    let sql = format!("SELECT {COLUMNS} FROM dining_table WHERE branch_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(branch_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(conn: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<DiningTable>> {
    let sql = format!("SELECT {COLUMNS} FROM dining_table WHERE id = ?");
    let row = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub async fn all_ids(conn: impl SqliteExecutor<'_>) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM dining_table ORDER BY id")
        .fetch_all(conn)
        .await?;
    Ok(ids)
}

/// Distinct capacities offered by a branch, ascending
pub async fn capacities(conn: impl SqliteExecutor<'_>, branch_id: i64) -> RepoResult<Vec<i32>> {
    let rows = sqlx::query_scalar::<_, i32>(
        "SELECT DISTINCT capacity FROM dining_table WHERE branch_id = ? ORDER BY capacity",
    )
    .bind(branch_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Take the table's write lock for the rest of the transaction
///
/// Must be the first statement of every transaction that changes the table's
/// occupancy, so concurrent writers on the same table serialize here.
pub async fn lock(conn: impl SqliteExecutor<'_>, id: i64, now: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE dining_table SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    ensure_affected(rows.rows_affected(), || format!("Table {id} not found"))
}

pub async fn set_available(conn: impl SqliteExecutor<'_>, id: i64, available: bool) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE dining_table SET available = ? WHERE id = ?")
        .bind(available)
        .bind(id)
        .execute(conn)
        .await?;
    ensure_affected(rows.rows_affected(), || format!("Table {id} not found"))
}

/// Tables of a branch that seat `capacity` and have no open record overlapping `[start, end)`
///
/// Records without an end count as occupying until just after `now`.
pub async fn find_available(
    conn: impl SqliteExecutor<'_>,
    branch_id: i64,
    capacity: i32,
    start: i64,
    end: i64,
    now: i64,
) -> RepoResult<Vec<DiningTable>> {
    let rows = sqlx::query_as::<_, DiningTable>(
        "SELECT t.id, t.branch_id, t.capacity, t.available FROM dining_table t \
         WHERE t.branch_id = ?1 AND t.capacity >= ?2 \
         AND NOT EXISTS ( \
             SELECT 1 FROM occupancy o \
             WHERE o.table_id = t.id AND o.status IN ('pending', 'served') \
             AND o.start_time < ?4 AND COALESCE(o.end_time, ?5 + 1) > ?3 \
         ) \
         ORDER BY t.capacity, t.id",
    )
    .bind(branch_id)
    .bind(capacity)
    .bind(start)
    .bind(end)
    .bind(now)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
