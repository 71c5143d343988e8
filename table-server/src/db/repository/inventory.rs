//! Inventory Repository

use super::RepoResult;
use shared::models::{Ingredient, InventoryLot, LotState, Supplier};
use sqlx::SqliteExecutor;

pub async fn ingredient_exists(conn: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM ingredient WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

pub async fn supplier_exists(conn: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM supplier WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_lot(
    conn: impl SqliteExecutor<'_>,
    ingredient_id: i64,
    branch_id: i64,
    supplier_id: i64,
    quantity: f64,
    expires_on: &str,
    lot_state: LotState,
    received_at: i64,
) -> RepoResult<InventoryLot> {
    let lot = sqlx::query_as::<_, InventoryLot>(
        "INSERT INTO inventory_lot (ingredient_id, branch_id, supplier_id, quantity, expires_on, lot_state, received_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         RETURNING id, ingredient_id, branch_id, supplier_id, quantity, expires_on, lot_state, received_at",
    )
    .bind(ingredient_id)
    .bind(branch_id)
    .bind(supplier_id)
    .bind(quantity)
    .bind(expires_on)
    .bind(lot_state)
    .bind(received_at)
    .fetch_one(conn)
    .await?;
    Ok(lot)
}

/// Positive stock movement for a received lot
pub async fn insert_receipt_movement(conn: impl SqliteExecutor<'_>, lot: &InventoryLot) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO inventory_movement (ingredient_id, branch_id, delta, lot_id, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(lot.ingredient_id)
    .bind(lot.branch_id)
    .bind(lot.quantity)
    .bind(lot.id)
    .bind(lot.received_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Current stock of an ingredient at a branch (sum of movements)
pub async fn stock_level(conn: impl SqliteExecutor<'_>, branch_id: i64, ingredient_id: i64) -> RepoResult<f64> {
    let stock = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(delta), 0.0) FROM inventory_movement WHERE branch_id = ? AND ingredient_id = ?",
    )
    .bind(branch_id)
    .bind(ingredient_id)
    .fetch_one(conn)
    .await?;
    Ok(stock)
}

pub async fn list_ingredients(conn: impl SqliteExecutor<'_>) -> RepoResult<Vec<Ingredient>> {
    let rows = sqlx::query_as::<_, Ingredient>("SELECT id, name, unit FROM ingredient ORDER BY name")
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn list_suppliers(conn: impl SqliteExecutor<'_>) -> RepoResult<Vec<Supplier>> {
    let rows = sqlx::query_as::<_, Supplier>("SELECT id, name FROM supplier ORDER BY name")
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

/// Usable lots expiring on or before `cutoff` (YYYY-MM-DD), soonest first
pub async fn lots_expiring_by(
    conn: impl SqliteExecutor<'_>,
    branch_id: Option<i64>,
    cutoff: &str,
) -> RepoResult<Vec<InventoryLot>> {
    let rows = sqlx::query_as::<_, InventoryLot>(
        "SELECT id, ingredient_id, branch_id, supplier_id, quantity, expires_on, lot_state, received_at \
         FROM inventory_lot \
         WHERE (?1 IS NULL OR branch_id = ?1) AND expires_on <= ?2 AND lot_state != 'damaged' \
         ORDER BY expires_on, id",
    )
    .bind(branch_id)
    .bind(cutoff)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
