//! Row lifecycle: add and edit modes, commits, and row-level operations.

mod controller;
mod increment;
mod session;

pub use controller::{CommitResult, DeleteOutcome, RowLifecycleController};
pub use increment::{next_free_identifier, next_identifier, IdentifierParts, Increment};
pub use session::{EditSession, Mode};
