//! Customer Repository

use super::{RepoError, RepoResult};
use shared::models::{Customer, CustomerComment, CustomerUpsert};
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, national_id, name, phone, email, created_at, updated_at";

/// Insert or update by `national_id`, returning the customer id
///
/// A `None` field keeps the stored value; a `Some` field overwrites it.
pub async fn upsert(conn: impl SqliteExecutor<'_>, data: &CustomerUpsert, now: i64) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO customer (national_id, name, phone, email, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
         ON CONFLICT(national_id) DO UPDATE SET \
             name = COALESCE(excluded.name, customer.name), \
             phone = COALESCE(excluded.phone, customer.phone), \
             email = COALESCE(excluded.email, customer.email), \
             updated_at = excluded.updated_at \
         RETURNING id",
    )
    .bind(&data.national_id)
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn find_by_national_id(
    conn: impl SqliteExecutor<'_>,
    national_id: &str,
) -> RepoResult<Option<Customer>> {
    let sql = format!("SELECT {COLUMNS} FROM customer WHERE national_id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(national_id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Take the customer's write lock, returning its id
pub async fn lock_by_national_id(
    conn: impl SqliteExecutor<'_>,
    national_id: &str,
    now: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "UPDATE customer SET updated_at = ? WHERE national_id = ? RETURNING id",
    )
    .bind(now)
    .bind(national_id)
    .fetch_optional(conn)
    .await?;
    id.ok_or_else(|| RepoError::NotFound(format!("Customer {national_id} not found")))
}

pub async fn insert_comment(
    conn: impl SqliteExecutor<'_>,
    customer_id: i64,
    occupancy_id: Option<i64>,
    comment: &str,
    now: i64,
) -> RepoResult<CustomerComment> {
    let row = sqlx::query_as::<_, CustomerComment>(
        "INSERT INTO customer_comment (customer_id, occupancy_id, comment, created_at) \
         VALUES (?, ?, ?, ?) \
         RETURNING id, customer_id, occupancy_id, comment, created_at",
    )
    .bind(customer_id)
    .bind(occupancy_id)
    .bind(comment)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(row)
}
