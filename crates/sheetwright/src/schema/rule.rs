//! Compiled per-header rules.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::header::Header;
use super::types::{DuplicatePolicy, FieldType};

/// The compiled validation and duplicate policy for one header.
///
/// Rules are never edited in place: a header change or a policy toggle
/// recompiles the whole [`RuleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Type the value is parsed and stored as.
    pub field_type: FieldType,
    /// Whether an empty value is an error.
    pub required: bool,
    /// Whether the header names an identifier column.
    pub unique: bool,
    /// Collision handling for this column.
    pub duplicate_policy: DuplicatePolicy,
}

impl FieldRule {
    /// A plain optional text rule.
    pub fn text() -> Self {
        Self {
            field_type: FieldType::Text,
            required: false,
            unique: false,
            duplicate_policy: DuplicatePolicy::None,
        }
    }

    /// Set the field type.
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Set whether the field is required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Mark the field unique, defaulting its policy to Strict.
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        if unique && self.duplicate_policy == DuplicatePolicy::None {
            self.duplicate_policy = DuplicatePolicy::Strict;
        }
        self
    }

    /// Set the duplicate policy.
    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

impl Default for FieldRule {
    fn default() -> Self {
        Self::text()
    }
}

/// Ordered mapping from header to its rule; exactly one rule per header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: IndexMap<Header, FieldRule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule set from header/rule pairs in column order.
    pub fn from_rules(rules: impl IntoIterator<Item = (Header, FieldRule)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Get the rule for a header.
    pub fn get(&self, header: &Header) -> Option<&FieldRule> {
        self.rules.get(header)
    }

    /// Get a header and its rule by header name (first match).
    pub fn get_by_name(&self, name: &str) -> Option<(&Header, &FieldRule)> {
        self.rules.iter().find(|(h, _)| h.name == name)
    }

    /// Iterate headers and rules in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&Header, &FieldRule)> {
        self.rules.iter()
    }

    /// Iterate headers in column order.
    pub fn headers(&self) -> impl Iterator<Item = &Header> {
        self.rules.keys()
    }

    /// Headers whose columns are compared against existing values.
    pub fn checked_headers(&self) -> impl Iterator<Item = (&Header, &FieldRule)> {
        self.rules
            .iter()
            .filter(|(_, rule)| rule.duplicate_policy.is_checked())
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no headers.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
