//! Dining Table API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{Role, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    let public_routes = Router::new().route("/available", get(handler::available));

    let staff_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route(
            "/{id}/status",
            get(handler::current_status).patch(handler::advance_status),
        )
        .layer(middleware::from_fn(require_role(Role::Staff)));

    public_routes.merge(staff_routes)
}
