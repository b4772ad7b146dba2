//! Mapping rules: how each destination column derives its value

use serde::{Deserialize, Serialize};

use super::Value;

/// A rule that produces a destination column value from a source row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// Direct copy of a named source column
    Copy {
        /// Source column name
        source: String,
    },
    /// The source row's timestamp if present and non-empty,
    /// else the wall-clock time at transfer time
    TimestampDefault {
        /// Source column holding the timestamp
        source: String,
    },
    /// JSON-encode the designated source column before storing
    SerializeJson {
        /// Source column holding the payload
        source: String,
    },
    /// A fixed literal, independent of the source row
    Constant {
        /// The constant value to use
        value: Value,
    },
}

impl Rule {
    /// Create a simple copy rule
    pub fn copy(source: impl Into<String>) -> Self {
        Rule::Copy {
            source: source.into(),
        }
    }

    /// Create a constant rule
    pub fn constant(value: Value) -> Self {
        Rule::Constant { value }
    }

    /// The source column this rule reads, if any
    pub fn source_column(&self) -> Option<&str> {
        match self {
            Rule::Copy { source } => Some(source),
            Rule::TimestampDefault { source } => Some(source),
            Rule::SerializeJson { source } => Some(source),
            Rule::Constant { .. } => None,
        }
    }

    /// Get a human-readable description of this rule
    pub fn describe(&self) -> String {
        match self {
            Rule::Copy { source } => format!("copy({})", source),
            Rule::TimestampDefault { source } => format!("timestamp_default({})", source),
            Rule::SerializeJson { source } => format!("serialize_json({})", source),
            Rule::Constant { value } => format!("constant({})", value),
        }
    }
}
