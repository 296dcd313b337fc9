//! Service descriptor at `/`

use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::assigner::SERVER_VERSION;

/// Public endpoints and their descriptions, also printed at startup
pub const ENDPOINTS: [(&str, &str); 4] = [
    ("POST /api/match-records", "提交比赛记录"),
    ("GET /api/match-records", "获取所有比赛记录"),
    ("GET /api/match-records/<record_id>", "获取特定比赛记录"),
    ("GET /api/health", "健康检查"),
];

#[derive(Debug, Serialize)]
pub struct ServiceDescriptor {
    pub success: bool,
    pub message: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

/// GET /
pub async fn service_descriptor() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        success: true,
        message: "Horus Match Records API Server".to_string(),
        version: SERVER_VERSION.to_string(),
        endpoints: ENDPOINTS
            .iter()
            .map(|(route, description)| (route.to_string(), description.to_string()))
            .collect(),
    })
}
