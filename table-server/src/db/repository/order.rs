//! Order Repository

use super::{RepoResult, ensure_affected};
use shared::models::{CustomerHistoryEntry, Order, OrderLine};
use sqlx::SqliteExecutor;

/// Insert an open dine-in header with a zero total
pub async fn insert_header(
    conn: impl SqliteExecutor<'_>,
    table_id: i64,
    branch_id: i64,
    customer_id: Option<i64>,
    now: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (table_id, branch_id, customer_id, status, order_type, total, created_at) \
         VALUES (?, ?, ?, 'open', 'dine_in', 0, ?) RETURNING id",
    )
    .bind(table_id)
    .bind(branch_id)
    .bind(customer_id)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn insert_line(
    conn: impl SqliteExecutor<'_>,
    order_id: i64,
    product_id: i64,
    quantity: i64,
    unit_price: f64,
    now: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO order_line (order_id, product_id, quantity, unit_price, created_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(order_id)
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn set_total(conn: impl SqliteExecutor<'_>, order_id: i64, total: f64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET total = ? WHERE id = ?")
        .bind(total)
        .bind(order_id)
        .execute(conn)
        .await?;
    ensure_affected(rows.rows_affected(), || format!("Order {order_id} not found"))
}

pub async fn find_by_id(conn: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>(
        "SELECT id, table_id, branch_id, customer_id, status, order_type, total, created_at \
         FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn find_lines(conn: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<Vec<OrderLine>> {
    let rows = sqlx::query_as::<_, OrderLine>(
        "SELECT id, order_id, product_id, quantity, unit_price FROM order_line \
         WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Ordered lines of a customer, newest first
pub async fn history_for_customer(
    conn: impl SqliteExecutor<'_>,
    customer_id: i64,
    limit: i64,
) -> RepoResult<Vec<CustomerHistoryEntry>> {
    let rows = sqlx::query_as::<_, CustomerHistoryEntry>(
        "SELECT o.id AS order_id, o.created_at AS ordered_at, o.branch_id, o.table_id, \
                l.product_id, p.name AS product_name, l.quantity, l.unit_price \
         FROM orders o \
         JOIN order_line l ON l.order_id = o.id \
         JOIN product p ON p.id = l.product_id \
         WHERE o.customer_id = ? \
         ORDER BY o.created_at DESC, o.id DESC, l.id \
         LIMIT ?",
    )
    .bind(customer_id)
    .bind(limit)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
