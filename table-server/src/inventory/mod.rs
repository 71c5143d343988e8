//! Inventory lot registration (入库)
//!
//! Consumption is recorded by the store trigger on `order_line`; this module
//! only adds stock.

use std::sync::Arc;

use chrono::Days;
use shared::error::ErrorCode;
use shared::models::{Ingredient, InventoryLot, LotCreate, Supplier};
use sqlx::SqlitePool;

use crate::core::{EngineError, EngineResult};
use crate::db::repository::{branch, inventory};
use crate::utils::Clock;
use crate::utils::time::parse_date;

const DEFAULT_EXPIRY_WINDOW_DAYS: u64 = 7;
const MAX_EXPIRY_WINDOW_DAYS: u64 = 365;

#[derive(Clone)]
pub struct InventoryService {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl InventoryService {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Insert a lot and its stock movement atomically
    pub async fn register_lot(&self, req: LotCreate) -> EngineResult<InventoryLot> {
        if !req.quantity.is_finite() || req.quantity <= 0.0 {
            return Err(EngineError::InvalidInput {
                code: ErrorCode::InvalidLotQuantity,
                message: format!("lot quantity must be positive, got {}", req.quantity),
            });
        }
        let expires_on = parse_date(req.expires_on.trim())?;
        let received_at = req.received_at.unwrap_or_else(|| self.clock.now_millis());

        let mut tx = self.pool.begin().await?;
        if !inventory::ingredient_exists(&mut *tx, req.ingredient_id).await? {
            return Err(EngineError::NotFound {
                code: ErrorCode::IngredientNotFound,
                message: format!("Ingredient {} not found", req.ingredient_id),
            });
        }
        if !inventory::supplier_exists(&mut *tx, req.supplier_id).await? {
            return Err(EngineError::NotFound {
                code: ErrorCode::SupplierNotFound,
                message: format!("Supplier {} not found", req.supplier_id),
            });
        }
        if branch::find_by_id(&mut *tx, req.branch_id).await?.is_none() {
            return Err(EngineError::NotFound {
                code: ErrorCode::BranchNotFound,
                message: format!("Branch {} not found", req.branch_id),
            });
        }

        let lot = inventory::insert_lot(
            &mut *tx,
            req.ingredient_id,
            req.branch_id,
            req.supplier_id,
            req.quantity,
            &expires_on.format("%Y-%m-%d").to_string(),
            req.lot_state,
            received_at,
        )
        .await?;
        inventory::insert_receipt_movement(&mut *tx, &lot).await?;
        tx.commit().await?;

        tracing::info!(
            lot_id = lot.id,
            ingredient_id = lot.ingredient_id,
            branch_id = lot.branch_id,
            quantity = lot.quantity,
            "Inventory lot registered"
        );
        Ok(lot)
    }

    pub async fn stock_level(&self, branch_id: i64, ingredient_id: i64) -> EngineResult<f64> {
        Ok(inventory::stock_level(&self.pool, branch_id, ingredient_id).await?)
    }

    pub async fn ingredients(&self) -> EngineResult<Vec<Ingredient>> {
        Ok(inventory::list_ingredients(&self.pool).await?)
    }

    pub async fn suppliers(&self) -> EngineResult<Vec<Supplier>> {
        Ok(inventory::list_suppliers(&self.pool).await?)
    }

    /// Fresh or frozen lots expiring within `days` (default 7), optionally for one branch
    pub async fn expiring_lots(&self, branch_id: Option<i64>, days: Option<u64>) -> EngineResult<Vec<InventoryLot>> {
        let days = days.unwrap_or(DEFAULT_EXPIRY_WINDOW_DAYS);
        if days > MAX_EXPIRY_WINDOW_DAYS {
            return Err(EngineError::InvalidInput {
                code: ErrorCode::ValueOutOfRange,
                message: format!("days must be at most {MAX_EXPIRY_WINDOW_DAYS}"),
            });
        }
        let today = self.clock.now().date_naive();
        let cutoff = today
            .checked_add_days(Days::new(days))
            .ok_or_else(|| EngineError::invalid("expiry window out of range"))?;
        Ok(inventory::lots_expiring_by(&self.pool, branch_id, &cutoff.format("%Y-%m-%d").to_string()).await?)
    }
}
