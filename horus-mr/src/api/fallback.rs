//! Responses for unmatched routes and panicking handlers

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::response::ApiResponse;
use crate::error::MSG_INTERNAL;

/// Fallback for any route the router does not know
pub async fn route_not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure("API接口不存在")),
    )
}

/// Fallback for a known path hit with a method it does not serve
pub async fn method_not_allowed() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::failure("请求方法不被允许")),
    )
}

/// Converts a handler panic into the generic 500 envelope
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    error!("Unhandled error in request handler: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::failure(MSG_INTERNAL)),
    )
        .into_response()
}
