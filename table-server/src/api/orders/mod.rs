//! Order API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{Role, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::open))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_role(Role::Staff)))
}
