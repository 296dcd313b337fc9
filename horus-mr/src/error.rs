//! Error types for horus-mr
//!
//! Client mistakes carry their exact message to the caller. Storage faults
//! are logged in full and answered with a generic message only.

use axum::{
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{debug, error};

use crate::api::response::ApiResponse;
use crate::store::StoreError;

/// Generic 500 message for failed submissions and unhandled faults
pub const MSG_INTERNAL: &str = "服务器内部错误";
/// Generic 500 message for failed reads
pub const MSG_FETCH_FAILED: &str = "获取记录失败";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Request could not be extracted; keeps the extractor's status
    #[error("Rejected request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    /// Storage failure (500); `message` is what the client sees
    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Adapter for `map_err` that tags a store failure with its client message
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| ApiError::Store { message, source }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!("Path rejected: {}", rejection.body_text());
        ApiError::Rejected {
            status: rejection.status(),
            message: "请求路径参数无效".to_string(),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        debug!("Body rejected: {}", rejection.body_text());
        ApiError::Rejected {
            status: rejection.status(),
            message: "请求体读取失败".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Rejected { status, message } => (status, message),
            ApiError::Store { message, source } => {
                error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
