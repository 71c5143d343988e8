//! Report API 模块 (manager)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{Role, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/top-products", get(handler::top_products))
        .route("/top-customers", get(handler::top_customers))
        .route("/top-reservation-customers", get(handler::top_reservation_customers))
        .route("/branch-activity", get(handler::branch_activity))
        .layer(middleware::from_fn(require_role(Role::Manager)))
}
