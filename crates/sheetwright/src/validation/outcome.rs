//! Error kinds and per-row validation results.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::{FieldType, Header, Row};

/// Kind of problem reported for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required field is empty after normalization.
    MissingRequired,
    /// The value does not parse as the field's type.
    InvalidFormat,
    /// The value collides with an existing one under a Strict policy, or no
    /// free identifier could be derived.
    DuplicateConflict,
    /// The value collides with an existing one under a Warn policy.
    DuplicateWarning,
}

impl ErrorKind {
    /// Returns true if this kind prevents a commit.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, ErrorKind::DuplicateWarning)
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::MissingRequired => "Missing Required",
            ErrorKind::InvalidFormat => "Invalid Format",
            ErrorKind::DuplicateConflict => "Duplicate Conflict",
            ErrorKind::DuplicateWarning => "Duplicate Warning",
        }
    }

    /// One message for one field, worded for display next to the input.
    pub fn message(&self, header: &Header, field_type: FieldType) -> String {
        match self {
            ErrorKind::MissingRequired => format!("'{}' is required.", header.name),
            ErrorKind::InvalidFormat => match field_type {
                FieldType::Integer => format!("'{}' expects a whole number.", header.name),
                FieldType::Decimal { .. } => {
                    format!("'{}' expects a numeric value.", header.name)
                }
                FieldType::Date => format!(
                    "'{}' expects a valid date (e.g., YYYY-MM-DD or DD/MM/YYYY).",
                    header.name
                ),
                FieldType::Email => {
                    format!("'{}' expects a valid email address.", header.name)
                }
                FieldType::Text => format!("'{}' has an invalid value.", header.name),
            },
            ErrorKind::DuplicateConflict => {
                format!("'{}': duplicate value found (Strict policy).", header.name)
            }
            ErrorKind::DuplicateWarning => {
                format!("'{}': possible duplicate value found.", header.name)
            }
        }
    }
}

/// Which row a candidate is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "row", rename_all = "snake_case")]
pub enum RowContext {
    /// A row that will be appended or inserted.
    #[default]
    New,
    /// Replacement values for the persisted row at this index.
    Existing(usize),
}

/// Outcome of validating one candidate row.
///
/// Always built whole for a candidate; never patched field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// One entry per header, in column order; `None` means the field passed.
    pub field_errors: IndexMap<Header, Option<ErrorKind>>,
    /// The values that would be stored: normalized, and canonical for typed
    /// fields that parsed.
    pub normalized: Row,
    /// The row this candidate targets.
    pub context: RowContext,
    /// True iff no field has an error.
    pub is_valid: bool,
}

impl ValidationResult {
    /// Build a result from per-field errors; `is_valid` is derived.
    pub fn new(
        field_errors: IndexMap<Header, Option<ErrorKind>>,
        normalized: Row,
        context: RowContext,
    ) -> Self {
        let is_valid = field_errors.values().all(Option::is_none);
        Self {
            field_errors,
            normalized,
            context,
            is_valid,
        }
    }

    /// The error for a header, if any.
    pub fn error(&self, header: &Header) -> Option<ErrorKind> {
        self.field_errors.get(header).copied().flatten()
    }

    /// The error for the first header with this name, if any.
    pub fn error_by_name(&self, name: &str) -> Option<ErrorKind> {
        self.field_errors
            .iter()
            .find(|(h, _)| h.name == name)
            .and_then(|(_, e)| *e)
    }

    /// Iterate the failing fields in column order.
    pub fn errors(&self) -> impl Iterator<Item = (&Header, ErrorKind)> {
        self.field_errors
            .iter()
            .filter_map(|(h, e)| e.map(|kind| (h, kind)))
    }

    /// Number of failing fields.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}
