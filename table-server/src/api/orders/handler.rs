//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{OrderCreate, OrderDetail, OrderReceipt};

use crate::api::{ApiResult, ok};
use crate::core::ServerState;

/// POST /api/orders - 开单
pub async fn open(State(state): State<ServerState>, Json(payload): Json<OrderCreate>) -> ApiResult<OrderReceipt> {
    ok(state.orders.open_order(payload).await?)
}

/// GET /api/orders/:id - 订单详情
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<OrderDetail> {
    ok(state.orders.get_order(id).await?)
}
