//! Branch API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{Role, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/branches", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}/capacities", get(handler::capacities))
        .layer(middleware::from_fn(require_role(Role::Staff)))
}
