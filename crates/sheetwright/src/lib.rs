//! Sheetwright: a validating record editor core for spreadsheet-backed tables.
//!
//! Sheetwright reads the header row of a sheet, compiles each header's text
//! into a field rule, and guards every write to the sheet with those rules.
//!
//! # Core Principles
//!
//! - **Headers are the schema**: markers such as `(R)`, `optional` or
//!   `(Unique)` and type keywords such as `Date` or `Amount` drive validation
//! - **Nothing invalid is written**: rows are normalized and checked before
//!   they reach the store
//! - **Identifiers stay unique**: Strict columns reject collisions, Warn
//!   columns flag them, and duplicated rows get the next free identifier
//!
//! # Example
//!
//! ```no_run
//! use sheetwright::{CsvOptions, Row, RowLifecycleController, Sheet, SheetwrightConfig};
//!
//! let mut sheet = Sheet::read_csv("orders.csv", &CsvOptions::default()).unwrap();
//! let mut controller = RowLifecycleController::for_store(SheetwrightConfig::default(), &sheet);
//!
//! let result = controller
//!     .commit(&mut sheet, Row::new(["ID004", "Dana", "12.5"]))
//!     .unwrap();
//! for message in result.messages(controller.rules()) {
//!     println!("{}", message);
//! }
//! ```

pub mod config;
pub mod duplicate;
pub mod error;
pub mod inference;
pub mod lifecycle;
pub mod schema;
pub mod store;
pub mod validation;

pub use config::{
    DuplicateConfig, LifecycleConfig, RuleConfig, RuleOverride, SheetwrightConfig,
    ValidationConfig,
};
pub use duplicate::{DuplicateIndex, DuplicatePolicyEngine, DuplicateVerdict, Verdicts};
pub use error::{Result, SheetwrightError};
pub use inference::HeaderRuleInferer;
pub use lifecycle::{CommitResult, DeleteOutcome, EditSession, Mode, RowLifecycleController};
pub use schema::{DuplicatePolicy, FieldRule, FieldType, Header, Row, RuleSet};
pub use store::{CsvOptions, Sheet, SheetStore};
pub use validation::{ErrorKind, RowContext, ValidationEngine, ValidationResult};
