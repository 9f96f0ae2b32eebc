//! Validation engine for candidate rows.

mod engine;
mod normalize;
mod outcome;

pub use engine::{FieldCheck, ValidationEngine};
pub use normalize::normalize;
pub use outcome::{ErrorKind, RowContext, ValidationResult};
