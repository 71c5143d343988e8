//! Product API 模块 (只读)

use axum::{Router, extract::State, routing::get};
use shared::models::Product;

use crate::api::{ApiResult, ok};
use crate::core::ServerState;
use crate::db::repository::product;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/products", get(list))
}

/// GET /api/products - 可售商品
async fn list(State(state): State<ServerState>) -> ApiResult<Vec<Product>> {
    ok(product::find_available(&state.pool).await?)
}
