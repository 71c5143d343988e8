//! Reservation / Walk-in API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{Role, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let public_routes = Router::new().route("/api/reservations", post(handler::create_reservation));

    let staff_routes = Router::new()
        .route("/api/walkins", post(handler::create_walkin))
        .route("/api/visits/today", get(handler::visits_today))
        .layer(middleware::from_fn(require_role(Role::Staff)));

    public_routes.merge(staff_routes)
}
