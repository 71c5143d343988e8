//! Shared fixtures for unit tests

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use sqlx::SqlitePool;

use crate::db::DbService;
use crate::utils::ManualClock;

/// Unix millis of a UTC wall-clock time
pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap().timestamp_millis()
}

/// Fresh migrated database with one branch and two tables (1: capacity 4, 2: capacity 2)
pub async fn setup(now: i64) -> (SqlitePool, Arc<ManualClock>) {
    let db = DbService::in_memory().await.unwrap();
    seed_branch(&db.pool, 1, "Centro").await;
    seed_table(&db.pool, 1, 1, 4).await;
    seed_table(&db.pool, 2, 1, 2).await;
    (db.pool, Arc::new(ManualClock::new(now)))
}

pub async fn seed_branch(pool: &SqlitePool, id: i64, name: &str) {
    sqlx::query("INSERT INTO branch (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn seed_table(pool: &SqlitePool, id: i64, branch_id: i64, capacity: i32) {
    sqlx::query("INSERT INTO dining_table (id, branch_id, capacity) VALUES (?, ?, ?)")
        .bind(id)
        .bind(branch_id)
        .bind(capacity)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn seed_product(pool: &SqlitePool, id: i64, name: &str, category: &str, price: f64, available: bool) {
    sqlx::query("INSERT INTO product (id, name, category, price, available) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(price)
        .bind(available)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
