//! Schema types: headers, rows, and the rules compiled from header text.

mod header;
mod row;
mod rule;
mod types;

pub use header::Header;
pub use row::Row;
pub use rule::{FieldRule, RuleSet};
pub use types::{DuplicatePolicy, FieldType};
