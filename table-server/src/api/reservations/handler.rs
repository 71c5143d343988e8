//! Reservation / Walk-in API Handlers

use axum::{Json, extract::State};
use shared::models::{OccupancyRecord, ReservationCreate, VisitSummary, WalkinCreate};

use crate::api::{ApiResult, ok};
use crate::core::ServerState;

/// POST /api/reservations - 预订
pub async fn create_reservation(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> ApiResult<OccupancyRecord> {
    ok(state.occupancy.create_reservation(payload).await?)
}

/// POST /api/walkins - 到店入座
pub async fn create_walkin(
    State(state): State<ServerState>,
    Json(payload): Json<WalkinCreate>,
) -> ApiResult<OccupancyRecord> {
    ok(state.occupancy.create_walkin(payload).await?)
}

/// GET /api/visits/today - 今日未结束的预订与到店
pub async fn visits_today(State(state): State<ServerState>) -> ApiResult<Vec<VisitSummary>> {
    ok(state.occupancy.visits_today().await?)
}
