//! TableRegistry - 桌台与可用标记
//!
//! `dining_table.available` is a cache of "no occupancy record currently holds
//! this table". It is written only by [`sync_availability`], which every
//! occupancy transition calls inside its own transaction, and by the
//! [`TableRegistry::reconcile`] repair pass.

use std::sync::Arc;
use std::time::Duration;

use shared::error::ErrorCode;
use shared::models::{AvailabilityCorrection, AvailableTablesQuery, DiningTable};
use sqlx::{SqliteConnection, SqlitePool};
use tokio_util::sync::CancellationToken;

use crate::core::{EngineError, EngineResult};
use crate::db::repository::{RepoError, branch, dining_table, occupancy};
use crate::occupancy::resolver;
use crate::utils::Clock;


#[derive(Clone)]
pub struct TableRegistry {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl TableRegistry {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    pub async fn get(&self, table_id: i64) -> EngineResult<DiningTable> {
        dining_table::find_by_id(&self.pool, table_id)
            .await?
            .ok_or_else(|| EngineError::table_not_found(table_id))
    }

    /// Cached flag of a table
    pub async fn is_available(&self, table_id: i64) -> EngineResult<bool> {
        Ok(self.get(table_id).await?.available)
    }

    pub async fn list(&self, branch_id: Option<i64>) -> EngineResult<Vec<DiningTable>> {
        let tables = match branch_id {
            Some(id) => dining_table::find_by_branch(&self.pool, id).await?,
            None => dining_table::find_all(&self.pool).await?,
        };
        Ok(tables)
    }

    /// Distinct capacities offered by a branch
    pub async fn capacities(&self, branch_id: i64) -> EngineResult<Vec<i32>> {
        if branch::find_by_id(&self.pool, branch_id).await?.is_none() {
            return Err(EngineError::NotFound {
                code: ErrorCode::BranchNotFound,
                message: format!("Branch {branch_id} not found"),
            });
        }
        Ok(dining_table::capacities(&self.pool, branch_id).await?)
    }

    /// Tables of a branch free for a party over a time window
    pub async fn find_available(&self, query: &AvailableTablesQuery) -> EngineResult<Vec<DiningTable>> {
        if query.capacity < 1 {
            return Err(EngineError::invalid("capacity must be at least 1"));
        }
        if query.end <= query.start {
            return Err(EngineError::invalid_window("window end must be after its start"));
        }
        let now = self.clock.now_millis();
        Ok(dining_table::find_available(
            &self.pool,
            query.branch_id,
            query.capacity,
            query.start,
            query.end,
            now,
        )
        .await?)
    }

    /// Recompute every table's flag from the ledger, one transaction per table
    ///
    /// Returns the tables whose cached flag had drifted.
    pub async fn reconcile(&self) -> EngineResult<Vec<AvailabilityCorrection>> {
        let ids = dining_table::all_ids(&self.pool).await?;
        let mut corrections = Vec::new();

        for table_id in ids {
            let now = self.clock.now_millis();
            let mut tx = self.pool.begin().await?;
            lock_table(&mut tx, table_id, now).await?;
            let was_available = dining_table::find_by_id(&mut *tx, table_id)
                .await?
                .map(|t| t.available)
                .ok_or_else(|| EngineError::table_not_found(table_id))?;
            let now_available = sync_availability(&mut tx, table_id, now).await?;
            tx.commit().await?;

            if was_available != now_available {
                tracing::warn!(
                    table_id,
                    was_available,
                    now_available,
                    "Table availability drifted from the ledger, corrected"
                );
                corrections.push(AvailabilityCorrection {
                    table_id,
                    was_available,
                    now_available,
                });
            }
        }

        tracing::debug!(corrected = corrections.len(), "Availability reconcile finished");
        Ok(corrections)
    }
}

fn table_error(table_id: i64) -> impl FnOnce(RepoError) -> EngineError {
    move |e| match e {
        RepoError::NotFound(_) => EngineError::table_not_found(table_id),
        other => other.into(),
    }
}

/// Take the table's write lock; must be the first statement of the transaction
pub async fn lock_table(conn: &mut SqliteConnection, table_id: i64, now: i64) -> EngineResult<()> {
    dining_table::lock(conn, table_id, now)
        .await
        .map_err(table_error(table_id))
}

/// Write the table's flag inside the caller's transaction
pub async fn set_available(conn: &mut SqliteConnection, table_id: i64, available: bool) -> EngineResult<()> {
    dining_table::set_available(conn, table_id, available)
        .await
        .map_err(table_error(table_id))
}

/// Re-derive the table's flag from its open records and store it
///
/// Runs inside the caller's transaction, after the ledger write it follows.
pub async fn sync_availability(conn: &mut SqliteConnection, table_id: i64, now: i64) -> EngineResult<bool> {
    let records = occupancy::find_open_by_table(&mut *conn, table_id).await?;
    let available = resolver::resolve_current(&records, now).is_none();
    set_available(conn, table_id, available).await?;
    Ok(available)
}

/// Periodic repair pass, until the token is cancelled
pub async fn run_reconcile_loop(registry: TableRegistry, period: Duration, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::debug!("Reconcile loop stopped");
                return;
            }
            _ = ticker.tick() => {
                if let Err(e) = registry.reconcile().await {
                    tracing::error!(error = %e, "Periodic reconcile failed");
                }
            }
        }
    }
}
