//! Duplicate-value policies for candidate rows.

mod engine;
mod index;

pub use engine::{DuplicatePolicyEngine, DuplicateVerdict, Verdicts};
pub use index::DuplicateIndex;

pub(crate) use engine::has_reject;
