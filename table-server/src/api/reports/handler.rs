//! Report API Handlers

use axum::extract::{Query, State};
use serde::Deserialize;
use shared::models::{BranchActivity, TopCustomer, TopProduct, TopReservationCustomer};

use crate::api::{ApiResult, ok};
use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// GET /api/reports/top-products?limit=10
pub async fn top_products(State(state): State<ServerState>, Query(q): Query<LimitQuery>) -> ApiResult<Vec<TopProduct>> {
    ok(state.reports.top_products(q.limit).await?)
}

/// GET /api/reports/top-customers?limit=10
pub async fn top_customers(State(state): State<ServerState>, Query(q): Query<LimitQuery>) -> ApiResult<Vec<TopCustomer>> {
    ok(state.reports.top_customers(q.limit).await?)
}

/// GET /api/reports/top-reservation-customers?limit=5
pub async fn top_reservation_customers(
    State(state): State<ServerState>,
    Query(q): Query<LimitQuery>,
) -> ApiResult<Vec<TopReservationCustomer>> {
    ok(state.reports.top_reservation_customers(q.limit).await?)
}

/// GET /api/reports/branch-activity
pub async fn branch_activity(State(state): State<ServerState>) -> ApiResult<Vec<BranchActivity>> {
    ok(state.reports.branch_activity().await?)
}
