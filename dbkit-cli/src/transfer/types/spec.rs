//! Transfer specification: the caller-supplied, read-only-for-the-run
//! description of one source table → destination table sync

use serde::{Deserialize, Serialize};

use crate::db::is_valid_identifier;

use super::Rule;

/// Top-level transfer specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferSpec {
    /// Human-readable name for this transfer
    pub name: String,
    /// Table to read from
    pub source_table: String,
    /// Table to write to
    pub target_table: String,
    /// Destination column holding the row timestamp
    pub timestamp_column: String,
    /// Dedupe key override; derived from the timestamp mapping when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedupe: Option<DedupeKey>,
    /// Ordered column mappings; iteration order is insert column order
    pub columns: Vec<ColumnMapping>,
}

/// Mapping for a single destination column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Destination column name
    pub target: String,
    /// Rule producing the column's value
    pub rule: Rule,
}

impl ColumnMapping {
    /// Create a new column mapping
    pub fn new(target: impl Into<String>, rule: Rule) -> Self {
        ColumnMapping {
            target: target.into(),
            rule,
        }
    }
}

/// The key deciding whether a source row's counterpart already exists
/// at the destination
///
/// Timestamp equality cannot distinguish two rows created in the same
/// instant, so the key is configurable rather than hard-wired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupeKey {
    /// Source column the key value is read from
    pub source_column: String,
    /// Destination column the key is probed against
    pub target_column: String,
}

/// Error from validating a transfer spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// The mapping has no columns
    EmptyMapping,
    /// Two mappings name the same destination column
    DuplicateColumn { column: String },
    /// A table or column name fails the identifier allow-list
    InvalidIdentifier { name: String },
}

impl std::fmt::Display for SpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecError::EmptyMapping => write!(f, "transfer spec has no column mappings"),
            SpecError::DuplicateColumn { column } => {
                write!(f, "destination column '{}' is mapped more than once", column)
            }
            SpecError::InvalidIdentifier { name } => {
                write!(
                    f,
                    "'{}' is not a valid identifier (letters, digits and underscores only)",
                    name
                )
            }
        }
    }
}

impl std::error::Error for SpecError {}

impl TransferSpec {
    /// Validate the spec before any database work
    ///
    /// Identifiers are checked against an allow-list because table and
    /// column names cannot be parameterized by the wire protocol.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.columns.is_empty() {
            return Err(SpecError::EmptyMapping);
        }

        let mut identifiers = vec![
            self.source_table.as_str(),
            self.target_table.as_str(),
            self.timestamp_column.as_str(),
        ];
        if let Some(dedupe) = &self.dedupe {
            identifiers.push(&dedupe.source_column);
            identifiers.push(&dedupe.target_column);
        }
        for mapping in &self.columns {
            identifiers.push(&mapping.target);
            if let Some(source) = mapping.rule.source_column() {
                identifiers.push(source);
            }
        }
        for name in identifiers {
            if !is_valid_identifier(name) {
                return Err(SpecError::InvalidIdentifier { name: name.into() });
            }
        }

        let mut seen = std::collections::HashSet::new();
        for mapping in &self.columns {
            if !seen.insert(mapping.target.as_str()) {
                return Err(SpecError::DuplicateColumn {
                    column: mapping.target.clone(),
                });
            }
        }

        Ok(())
    }

    /// Resolve the dedupe key, deriving the default from the timestamp
    /// mapping when no override is configured
    pub fn dedupe_key(&self) -> DedupeKey {
        if let Some(key) = &self.dedupe {
            return key.clone();
        }
        let source_column = self
            .columns
            .iter()
            .find(|m| m.target == self.timestamp_column)
            .and_then(|m| m.rule.source_column())
            .unwrap_or(&self.timestamp_column)
            .to_string();
        DedupeKey {
            source_column,
            target_column: self.timestamp_column.clone(),
        }
    }

    /// Destination column names in mapping order
    pub fn target_columns(&self) -> Vec<&str> {
        self.columns.iter().map(|m| m.target.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::types::Value;

    fn sample_spec() -> TransferSpec {
        TransferSpec {
            name: "chat-history".into(),
            source_table: "chat_log".into(),
            target_table: "chat_history".into(),
            timestamp_column: "created_at".into(),
            dedupe: None,
            columns: vec![
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
            ],
        }
    }

    #[test]
    fn test_validate_ok() {
        assert_eq!(sample_spec().validate(), Ok(()));
    }

    #[test]
    fn test_validate_empty_mapping() {
        let mut spec = sample_spec();
        spec.columns.clear();
        assert_eq!(spec.validate(), Err(SpecError::EmptyMapping));
    }

    #[test]
    fn test_validate_duplicate_column() {
        let mut spec = sample_spec();
        spec.columns
            .push(ColumnMapping::new("name", Rule::copy("username")));
        assert_eq!(
            spec.validate(),
            Err(SpecError::DuplicateColumn {
                column: "name".into()
            })
        );
    }

    #[test]
    fn test_validate_rejects_injectable_identifiers() {
        let mut spec = sample_spec();
        spec.target_table = "chat_history; DROP TABLE users".into();
        assert!(matches!(
            spec.validate(),
            Err(SpecError::InvalidIdentifier { .. })
        ));

        let mut spec = sample_spec();
        spec.columns[0].target = "name--".into();
        assert!(matches!(
            spec.validate(),
            Err(SpecError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_dedupe_key_derived_from_timestamp_mapping() {
        let key = sample_spec().dedupe_key();
        assert_eq!(key.source_column, "created_date");
        assert_eq!(key.target_column, "created_at");
    }

    #[test]
    fn test_dedupe_key_override_wins() {
        let mut spec = sample_spec();
        spec.dedupe = Some(DedupeKey {
            source_column: "request_id".into(),
            target_column: "request_id".into(),
        });
        let key = spec.dedupe_key();
        assert_eq!(key.source_column, "request_id");
        assert_eq!(key.target_column, "request_id");
    }

    #[test]
    fn test_target_columns_preserve_mapping_order() {
        assert_eq!(
            sample_spec().target_columns(),
            vec!["name", "created_at", "bot_response", "issue"]
        );
    }

    #[test]
    fn test_toml_deserialization() {
        let spec: TransferSpec = toml::from_str(
            r#"
            name = "chat-history"
            source_table = "chat_log"
            target_table = "chat_history"
            timestamp_column = "created_at"

            [[columns]]
            target = "name"
            rule = { type = "copy", source = "user" }

            [[columns]]
            target = "created_at"
            rule = { type = "timestamp_default", source = "created_date" }

            [[columns]]
            target = "issue"
            rule = { type = "constant", value = false }
            "#,
        )
        .unwrap();

        assert_eq!(spec.name, "chat-history");
        assert_eq!(spec.columns.len(), 3);
        assert_eq!(spec.columns[0].rule, Rule::copy("user"));
        assert_eq!(spec.columns[2].rule, Rule::constant(Value::Bool(false)));
        assert_eq!(spec.validate(), Ok(()));
    }
}
