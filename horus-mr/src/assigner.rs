//! Identity and receipt metadata for accepted submissions
//!
//! Ids are random UUIDv4 values and are never checked against the store.
//! Collisions in a 122-bit random space are treated as impossible; adding a
//! uniqueness scan would serialize concurrent submissions.

use std::sync::Arc;

use horus_common::time::{self, Clock, SystemClock};
use horus_common::uuid_utils;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{MatchRecord, TeamNo};

/// Version tag stamped on every record this build accepts
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A payload field has a JSON type the record schema cannot hold
#[derive(Debug, Error, PartialEq, Eq)]
#[error("字段类型错误: {field}")]
pub struct FieldTypeError {
    pub field: &'static str,
}

#[derive(Debug, Clone)]
pub struct Assigner {
    clock: Arc<dyn Clock>,
}

impl Default for Assigner {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Assigner {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Stamp a validated payload with id, `receivedAt` and `serverVersion`.
    ///
    /// Client values under the server-owned keys are discarded; every other
    /// key not in the fixed schema is carried through in the extension bag.
    pub fn assign(&self, mut payload: Map<String, Value>) -> Result<MatchRecord, FieldTypeError> {
        for key in ["id", "receivedAt", "serverVersion"] {
            payload.remove(key);
        }

        let event = take_string(&mut payload, "event")?;
        let match_code = take_string(&mut payload, "matchCode")?;
        let team_no = match payload.remove("teamNo") {
            Some(Value::Number(n)) => TeamNo::Number(n),
            Some(Value::String(s)) => TeamNo::Text(s),
            _ => return Err(FieldTypeError { field: "teamNo" }),
        };
        let action = match payload.remove("action") {
            None | Some(Value::Null) => None,
            Some(Value::Array(entries)) => Some(entries),
            Some(_) => return Err(FieldTypeError { field: "action" }),
        };

        Ok(MatchRecord {
            id: uuid_utils::generate().to_string(),
            received_at: time::to_iso(&self.clock.now()),
            server_version: SERVER_VERSION.to_string(),
            event,
            match_code,
            team_no,
            action,
            extra: payload,
        })
    }
}

fn take_string(payload: &mut Map<String, Value>, field: &'static str) -> Result<String, FieldTypeError> {
    match payload.remove(field) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(FieldTypeError { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use horus_common::time::FixedClock;
    use serde_json::json;
    use std::collections::HashSet;

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn fixed_assigner() -> Assigner {
        let at = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        Assigner::new(Arc::new(FixedClock(at)))
    }

    #[test]
    fn test_assign_stamps_metadata() {
        let record = fixed_assigner()
            .assign(payload(json!({"event": "Q1", "matchCode": "M10", "teamNo": 42})))
            .unwrap();

        assert!(!record.id.is_empty());
        assert_eq!(record.received_at, "2025-03-14T09:26:53.000000");
        assert_eq!(record.server_version, SERVER_VERSION);
        assert_eq!(record.event, "Q1");
        assert_eq!(record.match_code, "M10");
        assert_eq!(record.team_no.to_string(), "42");
        assert!(record.action.is_none());
    }

    #[test]
    fn test_server_fields_override_client_values() {
        let record = fixed_assigner()
            .assign(payload(json!({
                "id": "client-id",
                "receivedAt": "1999-01-01",
                "serverVersion": "0.0.1",
                "event": "Q1", "matchCode": "M10", "teamNo": 42
            })))
            .unwrap();

        assert_ne!(record.id, "client-id");
        assert_eq!(record.received_at, "2025-03-14T09:26:53.000000");
        assert_eq!(record.server_version, SERVER_VERSION);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_extra_fields_pass_through() {
        let record = fixed_assigner()
            .assign(payload(json!({
                "event": "Q1", "matchCode": "M10", "teamNo": "42",
                "action": [{"t": 1}],
                "alliance": "red",
                "auto": {"leave": true, "score": 3}
            })))
            .unwrap();

        assert_eq!(record.actions_count(), 1);
        assert_eq!(record.extra["alliance"], "red");
        assert_eq!(record.extra["auto"], json!({"leave": true, "score": 3}));
        assert_eq!(record.team_no, TeamNo::Text("42".to_string()));
    }

    #[test]
    fn test_ids_are_unique() {
        let assigner = Assigner::default();
        let ids: HashSet<String> = (0..500)
            .map(|_| {
                assigner
                    .assign(payload(json!({"event": "Q1", "matchCode": "M1", "teamNo": 1})))
                    .unwrap()
                    .id
            })
            .collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_wrong_types_rejected() {
        let assigner = fixed_assigner();
        let cases = [
            (json!({"event": 5, "matchCode": "M10", "teamNo": 42}), "event"),
            (json!({"event": "Q1", "matchCode": ["M10"], "teamNo": 42}), "matchCode"),
            (json!({"event": "Q1", "matchCode": "M10", "teamNo": true}), "teamNo"),
            (json!({"event": "Q1", "matchCode": "M10", "teamNo": 42, "action": "jump"}), "action"),
        ];
        for (input, field) in cases {
            assert_eq!(assigner.assign(payload(input)), Err(FieldTypeError { field }));
        }
    }
}
