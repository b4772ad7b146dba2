//! Scalar values flowing between source rows and destination binds

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::{Column, Row};

/// A value read from a source row or produced by a mapping rule
///
/// Untagged so constants in a TOML mapping read naturally
/// (`value = false`, `value = 18`, `value = "n/a"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/absent value
    Null,
    /// Boolean flag
    Bool(bool),
    /// Whole number
    Int(i64),
    /// Floating point
    Float(f64),
    /// Date and time (tried before String so RFC 3339 literals parse)
    DateTime(DateTime<Utc>),
    /// Text
    String(String),
    /// Structured payload (e.g. a response body stored as JSON)
    Json(serde_json::Value),
}

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check whether the value counts as absent for defaulting purposes:
    /// null, or an empty string
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a JSON value (used by the serialize rule)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::json!(*i),
            Value::Float(f) => serde_json::json!(*f),
            Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Json(v) => v.clone(),
        }
    }

    /// Parse from a JSON value
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Null
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Value::Json(json.clone()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "(null)"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::String(s) => write!(f, "{}", s),
            Value::Json(v) => write!(f, "{}", v),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

/// An immutable source row, materialized once from a query result and
/// consumed exactly once by the transformer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRow {
    values: HashMap<String, Value>,
}

impl SourceRow {
    /// Get a column's value, if the column is present
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Number of columns in the row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Materialize a row from an Any-driver result
    ///
    /// Decodes by progressive narrowing: integer, float, bool, text, blob.
    /// A value no branch can decode becomes null.
    pub fn from_any(row: &AnyRow) -> SourceRow {
        let mut values = HashMap::with_capacity(row.columns().len());
        for (idx, column) in row.columns().iter().enumerate() {
            values.insert(column.name().to_string(), decode_any(row, idx));
        }
        SourceRow { values }
    }
}

impl FromIterator<(String, Value)> for SourceRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        SourceRow {
            values: iter.into_iter().collect(),
        }
    }
}

fn decode_any(row: &AnyRow, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(Value::Int).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(Value::Float).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return v.map(Value::Bool).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return v
            .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            .unwrap_or(Value::Null);
    }
    log::debug!("column {} has an undecodable type, treating as null", idx);
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_missing() {
        assert!(Value::Null.is_missing());
        assert!(Value::String(String::new()).is_missing());
        assert!(!Value::String("2024-01-01".into()).is_missing());
        assert!(!Value::Int(0).is_missing());
        assert!(!Value::Bool(false).is_missing());
    }

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::from_json(&json!(null)), Value::Null);
        assert_eq!(Value::from_json(&json!(true)), Value::Bool(true));
        assert_eq!(Value::from_json(&json!(42)), Value::Int(42));
        assert_eq!(Value::from_json(&json!(1.5)), Value::Float(1.5));
        assert_eq!(
            Value::from_json(&json!("hello")),
            Value::String("hello".into())
        );
    }

    #[test]
    fn test_from_json_structured() {
        let payload = json!({"answer": "ok", "score": 3});
        assert_eq!(Value::from_json(&payload), Value::Json(payload.clone()));

        let list = json!([1, 2, 3]);
        assert_eq!(Value::from_json(&list), Value::Json(list.clone()));
    }

    #[test]
    fn test_to_json_round_trip() {
        let payload = json!({"answer": "ok"});
        assert_eq!(Value::Json(payload.clone()).to_json(), payload);
        assert_eq!(Value::Int(7).to_json(), json!(7));
        assert_eq!(Value::Null.to_json(), json!(null));
    }

    #[test]
    fn test_untagged_deserialization() {
        assert_eq!(toml_value("v = false"), Value::Bool(false));
        assert_eq!(toml_value("v = 18"), Value::Int(18));
        assert_eq!(toml_value("v = 1.5"), Value::Float(1.5));
        assert_eq!(toml_value("v = \"n/a\""), Value::String("n/a".into()));
    }

    #[test]
    fn test_source_row_lookup() {
        let row: SourceRow = [
            ("user".to_string(), Value::String("alice".into())),
            ("age".to_string(), Value::Int(30)),
        ]
        .into_iter()
        .collect();

        assert_eq!(row.get("user"), Some(&Value::String("alice".into())));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 2);
    }

    fn toml_value(doc: &str) -> Value {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            v: Value,
        }
        toml::from_str::<Wrapper>(doc).unwrap().v
    }
}
