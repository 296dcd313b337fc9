//! Required-field validation for inbound match records

use serde_json::{Map, Value};

/// Keys every submission must carry, in reporting order
pub const REQUIRED_FIELDS: [&str; 3] = ["event", "matchCode", "teamNo"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Accepted,
    /// Offending keys, always in `REQUIRED_FIELDS` order
    Rejected { missing_fields: Vec<&'static str> },
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted)
    }
}

/// Check a payload against the required-field contract
pub fn validate(payload: &Map<String, Value>) -> ValidationResult {
    let missing_fields: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|key| payload.get(*key).map_or(true, is_blank))
        .collect();

    if missing_fields.is_empty() {
        ValidationResult::Accepted
    } else {
        ValidationResult::Rejected { missing_fields }
    }
}

/// A present value still counts as missing when it is null, false, zero or empty
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_complete_payload_accepted() {
        let result = validate(&payload(json!({"event": "Q1", "matchCode": "M10", "teamNo": 42})));
        assert!(result.is_accepted());
    }

    #[test]
    fn test_string_team_no_accepted() {
        let result = validate(&payload(json!({"event": "Q1", "matchCode": "M10", "teamNo": "4242"})));
        assert_eq!(result, ValidationResult::Accepted);
    }

    #[test]
    fn test_empty_payload_reports_all_in_order() {
        let result = validate(&Map::new());
        assert_eq!(
            result,
            ValidationResult::Rejected {
                missing_fields: vec!["event", "matchCode", "teamNo"]
            }
        );
    }

    #[test]
    fn test_order_is_fixed_regardless_of_payload_order() {
        let result = validate(&payload(json!({"teamNo": "", "matchCode": "M1", "event": null})));
        assert_eq!(
            result,
            ValidationResult::Rejected {
                missing_fields: vec!["event", "teamNo"]
            }
        );
    }

    #[test]
    fn test_falsy_values_are_missing() {
        for blank in [json!(null), json!(""), json!(0), json!(0.0), json!(false), json!([]), json!({})] {
            let result = validate(&payload(json!({"event": "Q1", "matchCode": blank.clone(), "teamNo": 7})));
            assert_eq!(
                result,
                ValidationResult::Rejected {
                    missing_fields: vec!["matchCode"]
                },
                "value {} should count as missing",
                blank
            );
        }
    }

    #[test]
    fn test_extra_fields_ignored() {
        let result = validate(&payload(json!({
            "event": "Q1", "matchCode": "M10", "teamNo": 42, "anything": [1, 2, 3]
        })));
        assert!(result.is_accepted());
    }
}
