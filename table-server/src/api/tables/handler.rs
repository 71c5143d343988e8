//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{AvailableTablesQuery, DiningTable, StatusChange, StatusTransition, TableStatus};

use crate::api::{ApiResult, ok};
use crate::auth::CurrentUser;
use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub branch_id: Option<i64>,
}

/// GET /api/tables - 桌台列表 (可按门店过滤)
pub async fn list(State(state): State<ServerState>, Query(query): Query<ListQuery>) -> ApiResult<Vec<DiningTable>> {
    ok(state.tables.list(query.branch_id).await?)
}

/// GET /api/tables/:id - 单个桌台 (含缓存的可用标记)
pub async fn get_by_id(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<DiningTable> {
    ok(state.tables.get(id).await?)
}

/// GET /api/tables/available - 指定人数与时段的空闲桌台
pub async fn available(
    State(state): State<ServerState>,
    Query(query): Query<AvailableTablesQuery>,
) -> ApiResult<Vec<DiningTable>> {
    ok(state.tables.find_available(&query).await?)
}

/// GET /api/tables/:id/status - 桌台当前状态
pub async fn current_status(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<TableStatus> {
    ok(state.occupancy.current_status(id).await?)
}

/// PATCH /api/tables/:id/status - 推进当前占用记录的状态
pub async fn advance_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StatusChange>,
) -> ApiResult<StatusTransition> {
    let transition = state.occupancy.advance_status(id, payload.status).await?;
    tracing::debug!(user_id = %user.id, table_id = id, status = %payload.status, "Status change requested");
    ok(transition)
}
