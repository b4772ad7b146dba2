//! Row transfer engine
//!
//! Reads every row from a source table, decides per row (by a configurable
//! dedupe key) whether an equivalent row already exists at the destination,
//! and inserts the transformed row when it does not.

pub mod report;
pub mod run;
pub mod transform;
pub mod types;

pub use report::{RowFailure, TransferReport};
pub use run::run_transfer;
pub use transform::{transform_row, TransformError, TransformedRow};
pub use types::{ColumnMapping, DedupeKey, Rule, SourceRow, SpecError, TransferSpec, Value};
