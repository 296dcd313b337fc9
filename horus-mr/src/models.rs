//! Match record data model
//!
//! A record is a fixed core (identity, receipt metadata, the three required
//! fields and the action list) plus an extension bag holding every other
//! client-supplied key verbatim. Both halves serialize into one flat JSON
//! object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Team identifier as submitted: either a JSON number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamNo {
    Number(Number),
    Text(String),
}

impl fmt::Display for TeamNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamNo::Number(n) => write!(f, "{}", n),
            TeamNo::Text(s) => f.write_str(s),
        }
    }
}

/// Persisted match record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub received_at: String,
    pub server_version: String,
    pub event: String,
    pub match_code: String,
    pub team_no: TeamNo,
    /// Opaque action entries; `None` when the client sent none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Vec<Value>>,
    /// Client fields outside the fixed schema
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MatchRecord {
    pub fn actions_count(&self) -> usize {
        self.action.as_ref().map_or(0, Vec::len)
    }

    /// Project to a listing summary
    pub fn summary(&self, filename: impl Into<String>) -> RecordSummary {
        RecordSummary {
            id: self.id.clone(),
            filename: filename.into(),
            event: self.event.clone(),
            match_code: self.match_code.clone(),
            team_no: self.team_no.clone(),
            received_at: self.received_at.clone(),
            actions_count: self.actions_count(),
        }
    }
}

/// Lightweight projection of a record used for listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub id: String,
    /// Storage unit the summary was read from
    pub filename: String,
    pub event: String,
    pub match_code: String,
    pub team_no: TeamNo,
    pub received_at: String,
    pub actions_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored() -> Value {
        json!({
            "id": "7f1c",
            "receivedAt": "2025-03-14T09:26:53.589793",
            "serverVersion": "1.0.0",
            "event": "Q1",
            "matchCode": "M10",
            "teamNo": 42,
            "action": [{"t": 1}, {"t": 2}],
            "scout": "lin",
            "notes": {"defense": true}
        })
    }

    #[test]
    fn test_extra_fields_land_in_extension_bag() {
        let record: MatchRecord = serde_json::from_value(stored()).unwrap();
        assert_eq!(record.extra.len(), 2);
        assert_eq!(record.extra["scout"], "lin");
        assert_eq!(record.extra["notes"], json!({"defense": true}));
        assert_eq!(record.actions_count(), 2);
    }

    #[test]
    fn test_serializes_back_to_flat_object() {
        let record: MatchRecord = serde_json::from_value(stored()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), stored());
    }

    #[test]
    fn test_team_no_keeps_submitted_type() {
        let numeric: TeamNo = serde_json::from_value(json!(42)).unwrap();
        let text: TeamNo = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(serde_json::to_value(&numeric).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("42"));
        assert_eq!(numeric.to_string(), "42");
        assert_eq!(text.to_string(), "42");
    }

    #[test]
    fn test_missing_action_counts_zero_and_is_not_written() {
        let mut value = stored();
        value.as_object_mut().unwrap().remove("action");
        let record: MatchRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.actions_count(), 0);
        assert!(serde_json::to_value(&record).unwrap().get("action").is_none());
    }

    #[test]
    fn test_summary_projection() {
        let record: MatchRecord = serde_json::from_value(stored()).unwrap();
        let summary = serde_json::to_value(record.summary("Q1_M10_Team42_20250314_092653.json")).unwrap();
        assert_eq!(
            summary,
            json!({
                "id": "7f1c",
                "filename": "Q1_M10_Team42_20250314_092653.json",
                "event": "Q1",
                "matchCode": "M10",
                "teamNo": 42,
                "receivedAt": "2025-03-14T09:26:53.589793",
                "actionsCount": 2
            })
        );
    }

    #[test]
    fn test_missing_core_field_fails_to_deserialize() {
        let mut value = stored();
        value.as_object_mut().unwrap().remove("id");
        assert!(serde_json::from_value::<MatchRecord>(value).is_err());
    }
}
