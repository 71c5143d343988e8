//! HTTP API 路由
//!
//! | 前缀 | 模块 | 角色 |
//! |------|------|------|
//! | /health | [`health`] | 公共 |
//! | /api/branches | [`branches`] | staff |
//! | /api/tables | [`tables`] | staff (available: 公共) |
//! | /api/reservations, /api/walkins, /api/visits | [`reservations`] | 预订公共，其余 staff |
//! | /api/products | [`products`] | 公共 |
//! | /api/orders | [`orders`] | staff |
//! | /api/customers | [`customers`] | staff (comments: 公共) |
//! | /api/reports | [`reports`] | manager |
//! | /api/inventory | [`inventory`] | manager |
//! | /api/maintenance | [`maintenance`] | manager |

pub mod branches;
pub mod customers;
pub mod health;
pub mod inventory;
pub mod maintenance;
pub mod orders;
pub mod products;
pub mod reports;
pub mod reservations;
pub mod tables;

use axum::{Json, Router};
use shared::error::ApiResponse;

use crate::core::ServerState;
use crate::utils::AppResult;

/// Handler result wrapped in the unified response body
pub type ApiResult<T> = AppResult<Json<ApiResponse<T>>>;

#[inline]
pub(crate) fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// All routes, without the global layers
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(branches::router())
        .merge(tables::router())
        .merge(reservations::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(customers::router())
        .merge(reports::router())
        .merge(inventory::router())
        .merge(maintenance::router())
}
