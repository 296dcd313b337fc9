//! Match record endpoints
//!
//! Handlers only translate between HTTP and the validator, assigner and
//! store; none of them hold state across requests.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use super::fallback::method_not_allowed;
use super::response::ApiResponse;
use crate::error::{ApiError, ApiResult, MSG_FETCH_FAILED, MSG_INTERNAL};
use crate::models::{MatchRecord, RecordSummary, TeamNo};
use crate::validator::{self, ValidationResult};
use crate::AppState;

/// `data` of a successful submission
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRecord {
    pub id: String,
    pub filename: String,
    pub received_at: String,
    pub event: String,
    pub match_code: String,
    pub team_no: TeamNo,
    pub actions_count: usize,
}

/// POST /api/match-records
pub async fn create_record(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CreatedRecord>>)> {
    let payload = parse_payload(&body?)?;

    if let ValidationResult::Rejected { missing_fields } = validator::validate(&payload) {
        return Err(ApiError::BadRequest(format!(
            "缺少必要字段: {}",
            missing_fields.join(", ")
        )));
    }

    let record = state
        .assigner
        .assign(payload)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let filename = state
        .store
        .create(&record)
        .await
        .map_err(ApiError::store(MSG_INTERNAL))?;

    let actions_count = record.actions_count();
    info!(
        id = %record.id,
        event = %record.event,
        match_code = %record.match_code,
        team_no = %record.team_no,
        actions = actions_count,
        "Match record saved: {}",
        filename
    );

    let data = CreatedRecord {
        id: record.id,
        filename,
        received_at: record.received_at,
        event: record.event,
        match_code: record.match_code,
        team_no: record.team_no,
        actions_count,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("比赛记录上传成功", data)),
    ))
}

/// GET /api/match-records
pub async fn list_records(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<RecordSummary>>>> {
    let summaries = state
        .store
        .list_summaries()
        .await
        .map_err(ApiError::store(MSG_FETCH_FAILED))?;

    let message = if summaries.is_empty() {
        "暂无比赛记录".to_string()
    } else {
        format!("找到 {} 条比赛记录", summaries.len())
    };

    Ok(Json(ApiResponse::ok(message, summaries)))
}

/// GET /api/match-records/:id
pub async fn get_record(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<ApiResponse<MatchRecord>>> {
    let Path(id) = id?;
    let record = state
        .store
        .get_by_id(&id)
        .await
        .map_err(ApiError::store(MSG_FETCH_FAILED))?
        .ok_or_else(|| ApiError::NotFound("记录未找到".to_string()))?;

    Ok(Json(ApiResponse::ok("记录获取成功", record)))
}

/// Body must be a non-empty JSON object
fn parse_payload(body: &[u8]) -> ApiResult<Map<String, Value>> {
    let no_data = || ApiError::BadRequest("没有收到数据".to_string());
    let bad_format = || ApiError::BadRequest("JSON数据格式错误".to_string());

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(no_data());
    }

    match serde_json::from_slice::<Value>(body).map_err(|_| bad_format())? {
        Value::Null => Err(no_data()),
        Value::Object(map) if map.is_empty() => Err(no_data()),
        Value::Object(map) => Ok(map),
        _ => Err(bad_format()),
    }
}

/// Build match record routes
pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/match-records",
            get(list_records)
                .post(create_record)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/match-records/:id",
            get(get_record).fallback(method_not_allowed),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: ApiResult<Map<String, Value>>) -> String {
        match result {
            Err(ApiError::BadRequest(msg)) => msg,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_body() {
        assert_eq!(message(parse_payload(b"")), "没有收到数据");
        assert_eq!(message(parse_payload(b"  \n")), "没有收到数据");
        assert_eq!(message(parse_payload(b"null")), "没有收到数据");
        assert_eq!(message(parse_payload(b"{}")), "没有收到数据");
    }

    #[test]
    fn test_parse_malformed_body() {
        assert_eq!(message(parse_payload(b"{\"event\": ")), "JSON数据格式错误");
        assert_eq!(message(parse_payload(b"[1, 2]")), "JSON数据格式错误");
        assert_eq!(message(parse_payload(b"\"Q1\"")), "JSON数据格式错误");
    }

    #[test]
    fn test_parse_object() {
        let map = parse_payload(br#"{"event": "Q1"}"#).unwrap();
        assert_eq!(map["event"], "Q1");
    }
}
