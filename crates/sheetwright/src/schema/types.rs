//! Core type definitions for field rules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value type a field is validated and stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    /// Free text (whitespace-normalized only).
    Text,
    /// Whole numbers; fractional input is rounded half-up.
    Integer,
    /// Fixed-point numbers stored with exactly `scale` fractional digits.
    Decimal { scale: u32 },
    /// Calendar dates stored in one canonical format.
    Date,
    /// `local@domain` addresses.
    Email,
}

impl FieldType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Decimal { .. })
    }

    /// Short lowercase label, used in messages and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Decimal { .. } => "decimal",
            FieldType::Date => "date",
            FieldType::Email => "email",
        }
    }
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::Text
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Decimal { scale } => write!(f, "decimal({})", scale),
            other => f.write_str(other.label()),
        }
    }
}

/// How collisions with existing column values are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// No duplicate check.
    None,
    /// Collisions are reported but do not block a commit.
    Warn,
    /// Collisions block the commit.
    Strict,
}

impl DuplicatePolicy {
    /// Returns true if values in this column are compared against existing rows.
    pub fn is_checked(&self) -> bool {
        !matches!(self, DuplicatePolicy::None)
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DuplicatePolicy::None => "None",
            DuplicatePolicy::Warn => "Warn",
            DuplicatePolicy::Strict => "Strict",
        }
    }
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        DuplicatePolicy::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::Decimal { scale: 2 }.to_string(), "decimal(2)");
        assert_eq!(FieldType::Email.to_string(), "email");
        assert!(FieldType::Integer.is_numeric());
        assert!(!FieldType::Date.is_numeric());
    }

    #[test]
    fn test_policy_serde_roundtrip() {
        let json = serde_json::to_string(&DuplicatePolicy::Strict).unwrap();
        assert_eq!(json, "\"strict\"");
        let back: DuplicatePolicy = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(back, DuplicatePolicy::Warn);
        assert!(!DuplicatePolicy::None.is_checked());
    }
}
