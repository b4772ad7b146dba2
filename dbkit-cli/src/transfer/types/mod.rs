//! Types for the row transfer engine

mod rule;
mod spec;
mod value;

pub use rule::Rule;
pub use spec::{ColumnMapping, DedupeKey, SpecError, TransferSpec};
pub use value::{SourceRow, Value};
