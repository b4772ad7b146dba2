//! Row transformation - applies every column mapping in mapping order

use chrono::{DateTime, Utc};

use crate::transfer::types::{ColumnMapping, SourceRow, Value};

use super::apply::apply_rule;

/// Error from transforming one row
#[derive(Debug, Clone)]
pub struct TransformError {
    pub column: String,
    pub message: String,
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.column, self.message)
    }
}

impl std::error::Error for TransformError {}

/// One transformed row: destination columns and their values, in mapping
/// order, exactly one value per mapping entry
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedRow {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl TransformedRow {
    /// Destination column names in mapping order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values positionally aligned with `columns()`
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the row is empty
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Transform a single source row through the column mappings
///
/// Stops at the first failing column; the caller records the failure and
/// moves on to the next row.
pub fn transform_row(
    mappings: &[ColumnMapping],
    row: &SourceRow,
    now: DateTime<Utc>,
) -> Result<TransformedRow, TransformError> {
    let mut columns = Vec::with_capacity(mappings.len());
    let mut values = Vec::with_capacity(mappings.len());

    for mapping in mappings {
        let value = apply_rule(&mapping.rule, row, now).map_err(|message| TransformError {
            column: mapping.target.clone(),
            message,
        })?;
        columns.push(mapping.target.clone());
        values.push(value);
    }

    Ok(TransformedRow { columns, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::types::Rule;

    fn mappings() -> Vec<ColumnMapping> {
        vec![
            ColumnMapping::new("name", Rule::copy("user")),
            ColumnMapping::new(
                "created_at",
                Rule::TimestampDefault {
                    source: "created_date".into(),
                },
            ),
            ColumnMapping::new(
                "bot_response",
                Rule::SerializeJson {
                    source: "query_response".into(),
                },
            ),
            ColumnMapping::new("issue", Rule::constant(Value::Bool(false))),
        ]
    }

    fn source_row() -> SourceRow {
        [
            ("user".to_string(), Value::String("alice".into())),
            (
                "created_date".to_string(),
                Value::String("2024-03-01 10:00:00".into()),
            ),
            (
                "query_response".to_string(),
                Value::String("fine".into()),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_columns_follow_mapping_order() {
        let transformed = transform_row(&mappings(), &source_row(), Utc::now()).unwrap();
        assert_eq!(
            transformed.columns(),
            &["name", "created_at", "bot_response", "issue"]
        );
        assert_eq!(transformed.len(), 4);
    }

    #[test]
    fn test_one_value_per_mapping_entry() {
        let transformed = transform_row(&mappings(), &source_row(), Utc::now()).unwrap();
        assert_eq!(transformed.values().len(), transformed.columns().len());
        assert_eq!(transformed.values()[0], Value::String("alice".into()));
        assert_eq!(
            transformed.values()[1],
            Value::String("2024-03-01 10:00:00".into())
        );
        assert_eq!(transformed.values()[2], Value::String("\"fine\"".into()));
        assert_eq!(transformed.values()[3], Value::Bool(false));
    }

    #[test]
    fn test_empty_source_row_still_yields_every_column() {
        let now = Utc::now();
        let transformed = transform_row(&mappings(), &SourceRow::default(), now).unwrap();
        assert_eq!(transformed.len(), 4);
        assert_eq!(transformed.values()[0], Value::Null);
        assert_eq!(transformed.values()[1], Value::DateTime(now));
        assert_eq!(transformed.values()[2], Value::String("null".into()));
        assert_eq!(transformed.values()[3], Value::Bool(false));
    }
}
