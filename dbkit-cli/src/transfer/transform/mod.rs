//! Transform layer - turns source rows into destination-ready rows

mod apply;
mod engine;

pub use apply::{apply_rule, ApplyResult};
pub use engine::{transform_row, TransformError, TransformedRow};
