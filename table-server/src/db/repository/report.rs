//! Reporting Repository (read-only aggregates)

use super::RepoResult;
use shared::models::{BranchActivity, TopCustomer, TopProduct, TopReservationCustomer};
use sqlx::SqliteExecutor;

pub async fn top_products(conn: impl SqliteExecutor<'_>, limit: i64) -> RepoResult<Vec<TopProduct>> {
    let rows = sqlx::query_as::<_, TopProduct>(
        "SELECT p.id AS product_id, p.name AS product_name, \
                SUM(l.quantity) AS quantity_sold, \
                ROUND(SUM(l.quantity * l.unit_price), 2) AS revenue \
         FROM order_line l JOIN product p ON p.id = l.product_id \
         GROUP BY p.id, p.name \
         ORDER BY quantity_sold DESC, p.id \
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

pub async fn top_customers(conn: impl SqliteExecutor<'_>, limit: i64) -> RepoResult<Vec<TopCustomer>> {
    let rows = sqlx::query_as::<_, TopCustomer>(
        "SELECT c.id AS customer_id, c.national_id, c.name, \
                COUNT(o.id) AS order_count, ROUND(SUM(o.total), 2) AS total_spent \
         FROM orders o JOIN customer c ON c.id = o.customer_id \
         GROUP BY c.id, c.national_id, c.name \
         ORDER BY order_count DESC, total_spent DESC, c.id \
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Orders, revenue and bookings per branch
pub async fn branch_activity(conn: impl SqliteExecutor<'_>) -> RepoResult<Vec<BranchActivity>> {
    let rows = sqlx::query_as::<_, BranchActivity>(
        "SELECT b.id AS branch_id, b.name AS branch_name, \
                (SELECT COUNT(*) FROM orders o WHERE o.branch_id = b.id) AS order_count, \
                (SELECT ROUND(COALESCE(SUM(o.total), 0.0), 2) FROM orders o WHERE o.branch_id = b.id) AS revenue, \
                (SELECT COUNT(*) FROM occupancy v WHERE v.branch_id = b.id AND v.kind = 'scheduled') AS reservation_count, \
                (SELECT COUNT(*) FROM occupancy v WHERE v.branch_id = b.id AND v.kind = 'walkin') AS walkin_count \
         FROM branch b ORDER BY b.id",
    )
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Customers with the most scheduled reservations (cancelled ones excluded)
///
/// Favorites come from the `customer_favorite` cache and are null until
/// recomputed or when the category has no history.
pub async fn top_reservation_customers(
    conn: impl SqliteExecutor<'_>,
    limit: i64,
) -> RepoResult<Vec<TopReservationCustomer>> {
    let rows = sqlx::query_as::<_, TopReservationCustomer>(
        "SELECT c.id AS customer_id, c.national_id, c.name, r.reservation_count, \
                fd.product_name AS favorite_drink, \
                fc.product_name AS favorite_cookie, \
                fs.product_name AS favorite_savory \
         FROM (SELECT customer_id, COUNT(*) AS reservation_count FROM occupancy \
               WHERE kind = 'scheduled' AND status <> 'cancelled' AND customer_id IS NOT NULL \
               GROUP BY customer_id) r \
         JOIN customer c ON c.id = r.customer_id \
         LEFT JOIN customer_favorite fd ON fd.customer_id = c.id AND fd.category = 'drink' \
         LEFT JOIN customer_favorite fc ON fc.customer_id = c.id AND fc.category = 'cookie' \
         LEFT JOIN customer_favorite fs ON fs.customer_id = c.id AND fs.category = 'savory' \
         ORDER BY r.reservation_count DESC, c.id \
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
