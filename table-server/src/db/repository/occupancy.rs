//! Occupancy Repository
//!
//! Records are stored flat (`kind`, `start_time`, `end_time`) and lifted into
//! [`OccupancyKind`] when read.

use super::{RepoError, RepoResult, ensure_affected};
use shared::models::{OccupancyKind, OccupancyRecord, OccupancyStatus};
use sqlx::SqliteExecutor;

const SELECT: &str = "SELECT o.id, o.table_id, o.branch_id, o.customer_id, o.kind, o.status, \
     o.start_time, o.end_time, o.party_size, o.notes, \
     COALESCE(c.name, o.customer_name) AS customer_name, \
     COALESCE(c.national_id, o.national_id) AS national_id, o.created_at \
     FROM occupancy o LEFT JOIN customer c ON c.id = o.customer_id";

#[derive(sqlx::FromRow)]
struct OccupancyRow {
    id: i64,
    table_id: i64,
    branch_id: i64,
    customer_id: Option<i64>,
    kind: String,
    status: String,
    start_time: i64,
    end_time: Option<i64>,
    party_size: Option<i32>,
    notes: Option<String>,
    customer_name: Option<String>,
    national_id: Option<String>,
    created_at: i64,
}

impl TryFrom<OccupancyRow> for OccupancyRecord {
    type Error = RepoError;

    fn try_from(row: OccupancyRow) -> Result<Self, Self::Error> {
        let status: OccupancyStatus = row.status.parse().map_err(RepoError::Database)?;
        let kind = match row.kind.as_str() {
            "scheduled" => OccupancyKind::Scheduled {
                start: row.start_time,
                end: row.end_time,
            },
            "walkin" => OccupancyKind::Walkin {
                arrived_at: row.start_time,
                left_at: row.end_time,
            },
            other => {
                return Err(RepoError::Database(format!(
                    "occupancy {} has unknown kind '{other}'",
                    row.id
                )));
            }
        };
        Ok(OccupancyRecord {
            id: row.id,
            table_id: row.table_id,
            branch_id: row.branch_id,
            customer_id: row.customer_id,
            status,
            kind,
            party_size: row.party_size,
            notes: row.notes,
            customer_name: row.customer_name,
            national_id: row.national_id,
            created_at: row.created_at,
        })
    }
}

fn into_records(rows: Vec<OccupancyRow>) -> RepoResult<Vec<OccupancyRecord>> {
    rows.into_iter().map(OccupancyRecord::try_from).collect()
}

/// New record, always inserted as `pending`
#[derive(Debug, Clone)]
pub struct OccupancyInsert {
    pub table_id: i64,
    pub branch_id: i64,
    pub customer_id: Option<i64>,
    pub kind: OccupancyKind,
    pub party_size: Option<i32>,
    pub notes: Option<String>,
    pub customer_name: Option<String>,
    pub national_id: Option<String>,
}

pub async fn insert(conn: impl SqliteExecutor<'_>, data: &OccupancyInsert, now: i64) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO occupancy (table_id, branch_id, customer_id, kind, status, start_time, end_time, \
         party_size, notes, customer_name, national_id, created_at) \
         VALUES (?, ?, ?, ?, 'pending', ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.table_id)
    .bind(data.branch_id)
    .bind(data.customer_id)
    .bind(data.kind.tag())
    .bind(data.kind.start())
    .bind(data.kind.end())
    .bind(data.party_size)
    .bind(&data.notes)
    .bind(&data.customer_name)
    .bind(&data.national_id)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn find_by_id(conn: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<OccupancyRecord>> {
    let sql = format!("{SELECT} WHERE o.id = ?");
    let row = sqlx::query_as::<_, OccupancyRow>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    row.map(OccupancyRecord::try_from).transpose()
}

/// Pending and served records of a table
pub async fn find_open_by_table(conn: impl SqliteExecutor<'_>, table_id: i64) -> RepoResult<Vec<OccupancyRecord>> {
    let sql = format!(
        "{SELECT} WHERE o.table_id = ? AND o.status IN ('pending', 'served') ORDER BY o.start_time, o.id"
    );
    let rows = sqlx::query_as::<_, OccupancyRow>(&sql)
        .bind(table_id)
        .fetch_all(conn)
        .await?;
    into_records(rows)
}

/// First open record on the table whose interval overlaps `[start, end)`
///
/// Same overlap rule as [`super::dining_table::find_available`].
pub async fn find_overlapping(
    conn: impl SqliteExecutor<'_>,
    table_id: i64,
    start: i64,
    end: i64,
    now: i64,
) -> RepoResult<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM occupancy \
         WHERE table_id = ?1 AND status IN ('pending', 'served') \
         AND start_time < ?3 AND COALESCE(end_time, ?4 + 1) > ?2 \
         ORDER BY start_time, id LIMIT 1",
    )
    .bind(table_id)
    .bind(start)
    .bind(end)
    .bind(now)
    .fetch_optional(conn)
    .await?;
    Ok(id)
}

/// Set status, and the end time when given
pub async fn update_status(
    conn: impl SqliteExecutor<'_>,
    id: i64,
    status: OccupancyStatus,
    end: Option<i64>,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE occupancy SET status = ?, end_time = COALESCE(?, end_time) WHERE id = ?")
        .bind(status.as_str())
        .bind(end)
        .bind(id)
        .execute(conn)
        .await?;
    ensure_affected(rows.rows_affected(), || format!("Occupancy record {id} not found"))
}

/// Customer of the most recent record of a table that started within `[since, until]`
///
/// Any status counts. Records without a linked customer fall back to the
/// customer matching their denormalized national id.
pub async fn latest_customer_started(
    conn: impl SqliteExecutor<'_>,
    table_id: i64,
    since: i64,
    until: i64,
) -> RepoResult<Option<i64>> {
    let customer = sqlx::query_scalar::<_, Option<i64>>(
        "SELECT COALESCE(o.customer_id, c.id) FROM occupancy o \
         LEFT JOIN customer c ON c.national_id = o.national_id \
         WHERE o.table_id = ? AND o.start_time >= ? AND o.start_time <= ? \
         ORDER BY o.start_time DESC, o.id DESC LIMIT 1",
    )
    .bind(table_id)
    .bind(since)
    .bind(until)
    .fetch_optional(conn)
    .await?;
    Ok(customer.flatten())
}

/// Open records that started within `[start, end)`, earliest first
pub async fn find_open_between(conn: impl SqliteExecutor<'_>, start: i64, end: i64) -> RepoResult<Vec<OccupancyRecord>> {
    let sql = format!(
        "{SELECT} WHERE o.status IN ('pending', 'served') AND o.start_time >= ? AND o.start_time < ? \
         ORDER BY o.start_time, o.id"
    );
    let rows = sqlx::query_as::<_, OccupancyRow>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(conn)
        .await?;
    into_records(rows)
}

/// Most recent record of a customer (any status)
pub async fn latest_for_customer(conn: impl SqliteExecutor<'_>, customer_id: i64) -> RepoResult<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM occupancy WHERE customer_id = ? ORDER BY start_time DESC, id DESC LIMIT 1",
    )
    .bind(customer_id)
    .fetch_optional(conn)
    .await?;
    Ok(id)
}
