//! Customer Favorite Repository

use super::RepoResult;
use shared::models::{FavoriteEntry, FavoritePick, ProductCategory};
use sqlx::SqliteExecutor;

/// Order history of one customer aggregated per product
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ProductHistory {
    pub product_id: i64,
    pub product_name: String,
    pub category: ProductCategory,
    /// Number of order lines referencing the product
    pub order_count: i64,
    /// Creation time of the latest order containing the product
    pub last_ordered_at: i64,
}

pub async fn product_history(conn: impl SqliteExecutor<'_>, customer_id: i64) -> RepoResult<Vec<ProductHistory>> {
    let rows = sqlx::query_as::<_, ProductHistory>(
        "SELECT p.id AS product_id, p.name AS product_name, p.category, \
                COUNT(*) AS order_count, MAX(o.created_at) AS last_ordered_at \
         FROM orders o \
         JOIN order_line l ON l.order_id = o.id \
         JOIN product p ON p.id = l.product_id \
         WHERE o.customer_id = ? \
         GROUP BY p.id, p.name, p.category",
    )
    .bind(customer_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Overwrite one slot; `None` clears it
pub async fn upsert_slot(
    conn: impl SqliteExecutor<'_>,
    customer_id: i64,
    category: ProductCategory,
    pick: Option<&FavoritePick>,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO customer_favorite (customer_id, category, product_id, product_name, order_count, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         ON CONFLICT(customer_id, category) DO UPDATE SET \
             product_id = excluded.product_id, \
             product_name = excluded.product_name, \
             order_count = excluded.order_count, \
             updated_at = excluded.updated_at",
    )
    .bind(customer_id)
    .bind(category)
    .bind(pick.map(|p| p.product_id))
    .bind(pick.map(|p| p.product_name.as_str()))
    .bind(pick.map(|p| p.order_count))
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_customer(conn: impl SqliteExecutor<'_>, customer_id: i64) -> RepoResult<Vec<FavoriteEntry>> {
    let rows = sqlx::query_as::<_, FavoriteEntry>(
        "SELECT customer_id, category, product_id, product_name, order_count, updated_at \
         FROM customer_favorite WHERE customer_id = ? ORDER BY category",
    )
    .bind(customer_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
