//! Maintenance API 模块 (manager)

use axum::{Router, extract::State, middleware, routing::post};
use shared::models::AvailabilityCorrection;

use crate::api::{ApiResult, ok};
use crate::auth::{Role, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/maintenance/reconcile", post(reconcile))
        .layer(middleware::from_fn(require_role(Role::Manager)))
}

/// POST /api/maintenance/reconcile - 按占用记录修复桌台可用标记
async fn reconcile(State(state): State<ServerState>) -> ApiResult<Vec<AvailabilityCorrection>> {
    ok(state.tables.reconcile().await?)
}
