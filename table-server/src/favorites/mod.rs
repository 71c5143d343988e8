//! FavoritesAggregator - 常点商品缓存
//!
//! The cache is fully derived from order history and safe to overwrite.

pub mod ranking;

use std::sync::Arc;

use shared::models::{FavoritePick, FavoriteSlots};
use sqlx::SqlitePool;

use crate::core::{EngineError, EngineResult};
use crate::db::repository::{RepoError, customer, favorite};
use crate::utils::Clock;

#[derive(Clone)]
pub struct FavoritesAggregator {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl FavoritesAggregator {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Recompute and store the three slots of a customer
    ///
    /// One transaction per customer; every slot is overwritten, empty ones included.
    pub async fn recompute(&self, national_id: &str) -> EngineResult<FavoriteSlots> {
        let now = self.clock.now_millis();
        let mut tx = self.pool.begin().await?;
        let customer_id = customer::lock_by_national_id(&mut *tx, national_id, now)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => EngineError::customer_not_found(national_id),
                other => other.into(),
            })?;

        let history = favorite::product_history(&mut *tx, customer_id).await?;
        let slots = ranking::rank(&history);
        for category in shared::models::ProductCategory::ALL {
            favorite::upsert_slot(&mut *tx, customer_id, category, slots.get(category), now).await?;
        }
        tx.commit().await?;

        tracing::info!(
            customer_id,
            products = history.len(),
            "Favorites recomputed"
        );
        Ok(slots)
    }

    /// Stored slots of a customer (empty before the first recompute)
    pub async fn favorites(&self, national_id: &str) -> EngineResult<FavoriteSlots> {
        let customer = customer::find_by_national_id(&self.pool, national_id)
            .await?
            .ok_or_else(|| EngineError::customer_not_found(national_id))?;

        let mut slots = FavoriteSlots::default();
        for entry in favorite::find_by_customer(&self.pool, customer.id).await? {
            let pick = match (entry.product_id, entry.product_name, entry.order_count) {
                (Some(product_id), Some(product_name), Some(order_count)) => Some(FavoritePick {
                    product_id,
                    product_name,
                    order_count,
                }),
                _ => None,
            };
            slots.set(entry.category, pick);
        }
        Ok(slots)
    }
}
