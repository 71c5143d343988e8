//! OrderLedger - 订单
//!
//! An order is opened in one transaction: header with a zero total, one line
//! per requested product (price re-read and snapshotted), then the final
//! total. Any failure drops the transaction, so no header or line survives.

pub mod money;


use std::sync::Arc;

use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::{OrderCreate, OrderDetail, OrderReceipt};
use sqlx::SqlitePool;

use crate::core::{EngineError, EngineResult};
use crate::db::repository::{dining_table, order, product};
use crate::occupancy;
use crate::tables;
use crate::utils::Clock;

#[derive(Clone)]
pub struct OrderLedger {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl OrderLedger {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self {
            pool,
            clock,
            timezone,
        }
    }

    /// Open an order on a table, all-or-nothing
    ///
    /// The customer is the table's current occupant, else the one of its
    /// latest record already started today.
    pub async fn open_order(&self, req: OrderCreate) -> EngineResult<OrderReceipt> {
        if req.items.is_empty() {
            return Err(EngineError::InvalidInput {
                code: ErrorCode::OrderEmpty,
                message: "order must contain at least one item".into(),
            });
        }
        let lines: Vec<(i64, i64)> = req
            .items
            .iter()
            .map(|item| (item.product_id, money::clamp_quantity(item.quantity)))
            .collect();

        let now = self.clock.now_millis();
        let mut tx = self.pool.begin().await?;
        tables::lock_table(&mut tx, req.table_id, now).await?;
        let table = dining_table::find_by_id(&mut *tx, req.table_id)
            .await?
            .ok_or_else(|| EngineError::table_not_found(req.table_id))?;
        let customer_id =
            occupancy::customer_for_order(&mut tx, table.id, now, self.timezone).await?;

        let order_id = order::insert_header(&mut *tx, table.id, table.branch_id, customer_id, now).await?;

        let mut total = Decimal::ZERO;
        for (product_id, quantity) in &lines {
            let product = product::find_by_id(&mut *tx, *product_id)
                .await?
                .filter(|p| p.available)
                .ok_or(EngineError::InvalidProduct(*product_id))?;
            money::require_valid_price(product.id, product.price)?;

            order::insert_line(&mut *tx, order_id, product.id, *quantity, product.price, now).await?;
            total = money::add_line(total, product.price, *quantity)?;
        }

        let total = money::to_f64(total);
        order::set_total(&mut *tx, order_id, total).await?;
        tx.commit().await?;

        tracing::info!(
            order_id,
            table_id = table.id,
            branch_id = table.branch_id,
            customer_id = ?customer_id,
            total,
            lines = lines.len(),
            "Order opened"
        );
        Ok(OrderReceipt {
            order_id,
            customer_id,
            total,
            line_count: lines.len(),
        })
    }

    /// Order header with its lines
    pub async fn get_order(&self, order_id: i64) -> EngineResult<OrderDetail> {
        let mut tx = self.pool.begin().await?;
        let header = order::find_by_id(&mut *tx, order_id)
            .await?
            .ok_or_else(|| EngineError::order_not_found(order_id))?;
        let lines = order::find_lines(&mut *tx, order_id).await?;
        tx.rollback().await?;

        let detail = OrderDetail {
            order: header,
            lines,
        };
        if let Err(e) = verify_total(&detail) {
            tracing::error!(order_id, error = %e, "Stored order total diverges from its lines");
        }
        Ok(detail)
    }
}

/// Check that the stored total equals the sum of the lines
pub fn verify_total(detail: &OrderDetail) -> EngineResult<()> {
    if money::total_matches(detail.order.total, &detail.lines) {
        return Ok(());
    }
    Err(EngineError::Conflict {
        code: ErrorCode::OrderTotalMismatch,
        message: format!(
            "order {} total {} != sum of lines {}",
            detail.order.id,
            detail.order.total,
            money::to_f64(money::sum_lines(&detail.lines))
        ),
    })
}
