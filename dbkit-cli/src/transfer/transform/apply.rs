//! Rule application logic

use chrono::{DateTime, Utc};

use crate::transfer::types::{Rule, SourceRow, Value};

/// Result of applying a rule; the error is a bare message, wrapped with
/// the destination column by the caller
pub type ApplyResult = Result<Value, String>;

/// Apply a rule to a source row
///
/// `now` is injected so the timestamp fallback is deterministic in tests.
pub fn apply_rule(rule: &Rule, row: &SourceRow, now: DateTime<Utc>) -> ApplyResult {
    match rule {
        Rule::Copy { source } => Ok(row.get(source).cloned().unwrap_or(Value::Null)),

        Rule::TimestampDefault { source } => {
            let value = row.get(source).cloned().unwrap_or(Value::Null);
            if value.is_missing() {
                Ok(Value::DateTime(now))
            } else {
                Ok(value)
            }
        }

        Rule::SerializeJson { source } => {
            let value = row.get(source).cloned().unwrap_or(Value::Null);
            serde_json::to_string(&value.to_json())
                .map(Value::String)
                .map_err(|err| format!("cannot encode '{}' as JSON: {}", source, err))
        }

        Rule::Constant { value } => Ok(value.clone()),
    }
}
