//! Queue endpoints under `/api/tokens`

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use super::envelope::{ApiError, ApiResponse, ApiResult};
use super::AppState;
use crate::queue::{QueueStats, SubmitTokenRequest, Token};
use crate::service::QueueService;

pub async fn create_token(
    State(state): State<AppState>,
    body: Result<Json<SubmitTokenRequest>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<Token>), ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    debug!("Token submission: {:?}", request);

    let token = state.queue.submit(&request).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(token)))
}

pub async fn list_tokens(State(state): State<AppState>) -> ApiResult<Vec<Token>> {
    // One read guard so the list and its stats describe the same state
    let manager = state.queue.read().await;
    let snapshot = manager.snapshot().await;
    let stats = manager.stats().await;

    Ok(ApiResponse::ok(snapshot.tokens).with_stats(stats))
}

pub async fn get_stats(State(state): State<AppState>) -> ApiResult<QueueStats> {
    let stats = state.queue.stats().await?;
    Ok(ApiResponse::ok(stats))
}

pub async fn call_next(State(state): State<AppState>) -> ApiResult<Token> {
    let next = state.queue.call_next().await?;
    Ok(ApiResponse::maybe(next))
}

pub async fn mark_completed(State(state): State<AppState>) -> ApiResult<Token> {
    let completed = state.queue.mark_completed().await?;
    Ok(ApiResponse::maybe(completed))
}

pub async fn remove_token(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Token> {
    let removed = state.queue.remove(&id).await?;
    Ok(ApiResponse::ok(removed).with_message("Patient removed from queue"))
}

pub async fn clear_queue(State(state): State<AppState>) -> ApiResult<Vec<Token>> {
    state.queue.clear().await?;
    info!("Queue cleared via API");
    Ok(ApiResponse::ok(Vec::new()).with_message("Queue cleared"))
}
