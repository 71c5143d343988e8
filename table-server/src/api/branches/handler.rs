//! Branch API Handlers

use axum::extract::{Path, State};
use shared::models::Branch;

use crate::api::{ApiResult, ok};
use crate::core::ServerState;
use crate::db::repository::branch;

/// GET /api/branches - 所有门店
pub async fn list(State(state): State<ServerState>) -> ApiResult<Vec<Branch>> {
    ok(branch::find_all(&state.pool).await?)
}

/// GET /api/branches/:id/capacities - 门店桌台容量 (去重, 升序)
pub async fn capacities(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<Vec<i32>> {
    ok(state.tables.capacities(id).await?)
}
