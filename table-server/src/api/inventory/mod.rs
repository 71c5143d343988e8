//! Inventory API 模块 (manager)
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/inventory/lots | POST | 入库批次 |
//! | /api/inventory/stock | GET | 某门店某原料的当前库存 |
//! | /api/inventory/expiring | GET | 即将过期的批次 |
//! | /api/inventory/ingredients | GET | 原料列表 |
//! | /api/inventory/suppliers | GET | 供应商列表 |

use axum::{
    Json, Router,
    extract::{Query, State},
    middleware,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use shared::models::{Ingredient, InventoryLot, LotCreate, Supplier};

use crate::api::{ApiResult, ok};
use crate::auth::{CurrentUser, Role, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/inventory/lots", post(register_lot))
        .route("/api/inventory/stock", get(stock_level))
        .route("/api/inventory/expiring", get(expiring))
        .route("/api/inventory/ingredients", get(ingredients))
        .route("/api/inventory/suppliers", get(suppliers))
        .layer(middleware::from_fn(require_role(Role::Manager)))
}

/// POST /api/inventory/lots - 入库批次
async fn register_lot(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<LotCreate>,
) -> ApiResult<InventoryLot> {
    let lot = state.inventory.register_lot(payload).await?;
    tracing::info!(target: "security", event = "lot_registered", user_id = %user.id, lot_id = lot.id);
    ok(lot)
}

#[derive(Debug, Deserialize)]
struct StockQuery {
    branch_id: i64,
    ingredient_id: i64,
}

#[derive(Debug, Serialize)]
struct StockLevel {
    branch_id: i64,
    ingredient_id: i64,
    quantity: f64,
}

/// GET /api/inventory/stock?branch_id=1&ingredient_id=2
async fn stock_level(State(state): State<ServerState>, Query(q): Query<StockQuery>) -> ApiResult<StockLevel> {
    let quantity = state.inventory.stock_level(q.branch_id, q.ingredient_id).await?;
    ok(StockLevel {
        branch_id: q.branch_id,
        ingredient_id: q.ingredient_id,
        quantity,
    })
}

#[derive(Debug, Deserialize)]
struct ExpiringQuery {
    branch_id: Option<i64>,
    days: Option<u64>,
}

/// GET /api/inventory/expiring?branch_id=1&days=7
async fn expiring(State(state): State<ServerState>, Query(q): Query<ExpiringQuery>) -> ApiResult<Vec<InventoryLot>> {
    ok(state.inventory.expiring_lots(q.branch_id, q.days).await?)
}

async fn ingredients(State(state): State<ServerState>) -> ApiResult<Vec<Ingredient>> {
    ok(state.inventory.ingredients().await?)
}

async fn suppliers(State(state): State<ServerState>) -> ApiResult<Vec<Supplier>> {
    ok(state.inventory.suppliers().await?)
}
