//! Health check endpoint

use axum::Json;
use serde::Serialize;

use horus_common::time;

/// Service name reported by the health check
pub const SERVICE_NAME: &str = "Horus Match Records API";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    /// Always "healthy" while the process can answer
    pub status: String,
    /// Local wall-clock time of the check
    pub timestamp: String,
    pub service: String,
}

/// GET /api/health
///
/// Does not touch storage, so it answers even when the storage root is unusable.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "服务运行正常".to_string(),
        status: "healthy".to_string(),
        timestamp: time::to_iso(&time::now()),
        service: SERVICE_NAME.to_string(),
    })
}
