//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{CommentCreate, Customer, CustomerComment, CustomerHistoryEntry, CustomerUpsert, FavoriteSlots};

use crate::api::{ApiResult, ok};
use crate::core::ServerState;

/// POST /api/customers - 按证件号新增或更新
pub async fn upsert(State(state): State<ServerState>, Json(payload): Json<CustomerUpsert>) -> ApiResult<Customer> {
    let national_id = payload.national_id.trim().to_string();
    state.clients.upsert(payload).await?;
    ok(state.clients.find_by_national_id(&national_id).await?)
}

/// GET /api/customers/:national_id
pub async fn get_by_national_id(
    State(state): State<ServerState>,
    Path(national_id): Path<String>,
) -> ApiResult<Customer> {
    ok(state.clients.find_by_national_id(&national_id).await?)
}

/// GET /api/customers/:national_id/history - 最近的点单明细
pub async fn history(
    State(state): State<ServerState>,
    Path(national_id): Path<String>,
) -> ApiResult<Vec<CustomerHistoryEntry>> {
    ok(state.clients.history(&national_id).await?)
}

/// GET /api/customers/:national_id/favorites - 常点缓存
pub async fn favorites(State(state): State<ServerState>, Path(national_id): Path<String>) -> ApiResult<FavoriteSlots> {
    ok(state.favorites.favorites(&national_id).await?)
}

/// POST /api/customers/:national_id/favorites/recompute - 重算常点
pub async fn recompute_favorites(
    State(state): State<ServerState>,
    Path(national_id): Path<String>,
) -> ApiResult<FavoriteSlots> {
    ok(state.favorites.recompute(&national_id).await?)
}

/// POST /api/customers/:national_id/comments - 留言
pub async fn add_comment(
    State(state): State<ServerState>,
    Path(national_id): Path<String>,
    Json(payload): Json<CommentCreate>,
) -> ApiResult<CustomerComment> {
    ok(state.clients.record_comment(&national_id, &payload.comment).await?)
}
