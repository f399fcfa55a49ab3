//! Admin endpoints under `/api/admin`

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, warn};

use super::envelope::{ApiError, ApiResponse, ApiResult};
use super::AppState;
use crate::admin::{self, AdminStats, LoginRequest};

pub async fn get_stats(State(state): State<AppState>) -> ApiResult<AdminStats> {
    let queue = state.queue.read().await.snapshot().await;
    let directory = state.directory.read().await;

    Ok(ApiResponse::ok(admin::dashboard_stats(
        &queue,
        &directory,
        admin::today(),
    )))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<()> {
    // A missing or malformed body is just a failed login
    let request = body.map(|Json(r)| r).unwrap_or_default();

    if admin::check_login(&state.admin, &request) {
        info!("Admin login succeeded");
        Ok(ApiResponse::message_only("Login successful"))
    } else {
        warn!("Admin login rejected for {:?}", request.username);
        Err(ApiError::Unauthorized("Invalid credentials".to_string()))
    }
}
