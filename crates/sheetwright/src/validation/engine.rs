//! Per-field type, format and required checks for candidate rows.

use std::fmt::Write as _;
use std::str::FromStr;

use chrono::NaiveDate;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::trace;

use crate::config::ValidationConfig;
use crate::schema::{FieldRule, FieldType, Row, RuleSet};

use super::normalize::normalize;
use super::outcome::{ErrorKind, RowContext, ValidationResult};

/// `local@domain.tld` with no whitespace anywhere.
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Plain number: optional sign, digits with optional fraction, optional exponent.
static PLAIN_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap());

/// Number with `,` thousands grouping in the integer part.
static GROUPED_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d*)?$").unwrap());

/// Outcome of checking a single field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck {
    /// Value to store (canonical form when the value parsed).
    pub value: String,
    /// Problem found, if any.
    pub error: Option<ErrorKind>,
}

/// Applies type, format and required checks to candidate rows.
///
/// Every field is checked independently so callers can show all problems at
/// once. Problems are returned in the result, never raised.
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Create an engine with default date patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom settings.
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// The settings in use.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate every field of `candidate` against `rules`.
    pub fn validate(&self, candidate: &Row, rules: &RuleSet, context: RowContext) -> ValidationResult {
        let mut field_errors = IndexMap::with_capacity(rules.len());
        let mut normalized = Row::blank(rules.len());

        for (header, rule) in rules.iter() {
            let check = self.check_field(candidate.value(header), rule);
            if let Some(kind) = check.error {
                trace!(header = %header.name, error = kind.label(), "field failed validation");
            }
            normalized.set(header.position, check.value);
            field_errors.insert(header.clone(), check.error);
        }

        ValidationResult::new(field_errors, normalized, context)
    }

    /// Check one raw value against one rule.
    pub fn check_field(&self, raw: &str, rule: &FieldRule) -> FieldCheck {
        let value = normalize(raw);

        if value.is_empty() {
            let error = rule.required.then_some(ErrorKind::MissingRequired);
            return FieldCheck { value, error };
        }

        let parsed = match rule.field_type {
            FieldType::Text => Some(value.clone()),
            FieldType::Integer => self.parse_number(&value).and_then(|n| round_to(n, 0)),
            FieldType::Decimal { scale } => {
                self.parse_number(&value).and_then(|n| round_to(n, scale))
            }
            FieldType::Date => self.parse_date(&value),
            FieldType::Email => EMAIL.is_match(&value).then(|| value.clone()),
        };

        match parsed {
            Some(stored) => FieldCheck {
                value: stored,
                error: None,
            },
            None => FieldCheck {
                value,
                error: Some(ErrorKind::InvalidFormat),
            },
        }
    }

    /// Parse a normalized numeric value.
    pub fn parse_number(&self, value: &str) -> Option<Decimal> {
        let compact: String;
        let mut text = value;

        if text.contains(',') {
            if !self.config.allow_thousands_separator || !GROUPED_NUMBER.is_match(text) {
                return None;
            }
            compact = text.replace(',', "");
            text = &compact;
        }

        if !PLAIN_NUMBER.is_match(text) {
            return None;
        }

        let unsigned = text.strip_prefix('+').unwrap_or(text);
        if unsigned.contains(['e', 'E']) {
            Decimal::from_scientific(unsigned).ok()
        } else {
            Decimal::from_str(unsigned).ok()
        }
    }

    /// Parse a normalized date against the configured patterns, first match
    /// wins, and render it in the canonical format.
    pub fn parse_date(&self, value: &str) -> Option<String> {
        let date = self
            .config
            .date_formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())?;

        let mut out = String::new();
        if write!(out, "{}", date.format(&self.config.canonical_date_format)).is_err() {
            out = date.format("%Y-%m-%d").to_string();
        }
        Some(out)
    }
}

/// Round half away from zero and render with exactly `scale` digits.
///
/// `None` if the value is too large to carry `scale` fractional digits.
fn round_to(value: Decimal, scale: u32) -> Option<String> {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);
    if rounded.scale() != scale {
        return None;
    }
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    Some(rounded.to_string())
}
