//! Customer API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{Role, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customers", routes())
}

fn routes() -> Router<ServerState> {
    let public_routes = Router::new().route("/{national_id}/comments", post(handler::add_comment));

    let staff_routes = Router::new()
        .route("/", post(handler::upsert))
        .route("/{national_id}", get(handler::get_by_national_id))
        .route("/{national_id}/history", get(handler::history))
        .route("/{national_id}/favorites", get(handler::favorites))
        .route("/{national_id}/favorites/recompute", post(handler::recompute_favorites))
        .layer(middleware::from_fn(require_role(Role::Staff)));

    public_routes.merge(staff_routes)
}
