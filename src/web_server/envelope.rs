//! Response envelope shared by every endpoint: `{success, data, message?}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::queue::{QueueError, QueueStats};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<QueueStats>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            count: None,
            stats: None,
        }
    }

    /// Success whose payload may legitimately be `null`
    pub fn maybe(data: Option<T>) -> Self {
        Self {
            data,
            ..Self::ok_empty()
        }
    }

    fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
            count: None,
            stats: None,
        }
    }

    pub fn message_only(message: impl Into<String>) -> Self {
        Self::ok_empty().with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_stats(mut self, stats: QueueStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// List payload with its `count`
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::ok(items)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Error rendered as `{success: false, message}` with a matching status
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("API internal error: {}", detail);
        }

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            message: Some(self.to_string()),
            count: None,
            stats: None,
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<QueueError> for ApiError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Validation(message) => ApiError::BadRequest(message),
            QueueError::NotFound(message) => ApiError::NotFound(message),
            QueueError::Storage(e) => ApiError::Internal(e.to_string()),
            QueueError::Transport(e) => ApiError::Internal(e),
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
