//! Configuration for rule inference, validation, duplicate checks and the
//! row lifecycle.
//!
//! Every token list is data rather than code, so header wording can be tuned
//! per workbook. Configs round-trip through JSON; missing fields fall back to
//! their defaults.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetwrightError};
use crate::schema::{DuplicatePolicy, FieldType};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetwrightConfig {
    /// Header rule inference settings.
    pub rules: RuleConfig,
    /// Value validation settings.
    pub validation: ValidationConfig,
    /// Duplicate comparison settings.
    pub duplicates: DuplicateConfig,
    /// Row lifecycle settings.
    pub lifecycle: LifecycleConfig,
}

impl SheetwrightConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SheetwrightError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: SheetwrightConfig = serde_json::from_reader(BufReader::new(file))?;
        config.check()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| SheetwrightError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Reject configurations the engines cannot work with.
    pub fn check(&self) -> Result<()> {
        if self.validation.date_formats.is_empty() {
            return Err(SheetwrightError::Config(
                "validation.date_formats must list at least one pattern".to_string(),
            ));
        }
        if self.validation.canonical_date_format.trim().is_empty() {
            return Err(SheetwrightError::Config(
                "validation.canonical_date_format must not be empty".to_string(),
            ));
        }
        for pattern in self
            .validation
            .date_formats
            .iter()
            .chain(std::iter::once(&self.validation.canonical_date_format))
        {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(SheetwrightError::Config(format!(
                    "invalid date pattern '{}'",
                    pattern
                )));
            }
        }
        if self.lifecycle.max_increment_attempts == 0 {
            return Err(SheetwrightError::Config(
                "lifecycle.max_increment_attempts must be at least 1".to_string(),
            ));
        }
        if self.rules.decimal_places > 28 {
            return Err(SheetwrightError::Config(format!(
                "rules.decimal_places is {}, maximum is 28",
                self.rules.decimal_places
            )));
        }
        Ok(())
    }
}

/// Per-header manual settings that win over inference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_policy: Option<DuplicatePolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
}

impl RuleOverride {
    /// Override the required flag.
    pub fn required(required: bool) -> Self {
        Self {
            required: Some(required),
            ..Self::default()
        }
    }

    /// Override the duplicate policy.
    pub fn policy(policy: DuplicatePolicy) -> Self {
        Self {
            duplicate_policy: Some(policy),
            ..Self::default()
        }
    }

    /// Returns true if nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.required.is_none() && self.duplicate_policy.is_none() && self.field_type.is_none()
    }
}

/// Token sets used to compile header text into rules.
///
/// All matching is case-insensitive substring matching; tokens are compared
/// in lowercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub required_markers: Vec<String>,
    pub optional_markers: Vec<String>,
    /// Text headers containing these are optional (notes, remarks).
    pub optional_text_tokens: Vec<String>,
    pub unique_markers: Vec<String>,
    /// Substrings that make a header an identifier ("id").
    pub identifier_tokens: Vec<String>,
    pub warn_markers: Vec<String>,
    pub date_tokens: Vec<String>,
    pub email_tokens: Vec<String>,
    pub decimal_tokens: Vec<String>,
    pub integer_tokens: Vec<String>,
    /// Fractional digits kept for decimal fields.
    pub decimal_places: u32,
    /// Treat the last column as optional unless it carries a required marker.
    pub trailing_column_optional: bool,
    /// Manual per-header settings, keyed by header name.
    pub overrides: IndexMap<String, RuleOverride>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            required_markers: strings(&["(r)", "[required]"]),
            optional_markers: strings(&["optional"]),
            optional_text_tokens: strings(&["notes", "remarks", "description", "comment"]),
            unique_markers: strings(&["(unique)", "[strict]"]),
            identifier_tokens: strings(&["id"]),
            warn_markers: strings(&["(duplicate-warn)", "[warn]"]),
            date_tokens: strings(&["date", "dob", "birth"]),
            email_tokens: strings(&["email"]),
            decimal_tokens: strings(&["amount", "price", "rate", "total", "cost", "balance"]),
            integer_tokens: strings(&["qty", "quantity", "age", "count", "number"]),
            decimal_places: 2,
            trailing_column_optional: true,
            overrides: IndexMap::new(),
        }
    }
}

impl RuleConfig {
    /// Add or replace the override for a header name.
    pub fn with_override(mut self, header: impl Into<String>, rule: RuleOverride) -> Self {
        self.overrides.insert(header.into(), rule);
        self
    }
}

/// Settings for value parsing and normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// chrono strftime patterns, tried in order; the first match wins.
    pub date_formats: Vec<String>,
    /// Pattern every accepted date is stored in.
    pub canonical_date_format: String,
    /// Accept `,` as a thousands separator in numeric fields.
    pub allow_thousands_separator: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            date_formats: strings(&[
                "%Y-%m-%d",
                "%d/%m/%Y",
                "%m/%d/%Y",
                "%d-%m-%Y",
                "%Y/%m/%d",
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%d %H:%M:%S",
            ]),
            canonical_date_format: "%Y-%m-%d".to_string(),
            allow_thousands_separator: true,
        }
    }
}

/// Settings for duplicate comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateConfig {
    /// Compare values exactly instead of case-folded.
    pub case_sensitive: bool,
}

/// Settings for row mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Upper bound on identifier increments when searching for a free value.
    pub max_increment_attempts: usize,
    /// Fill blank identifier fields on add from the column's last value.
    pub auto_fill_blank_identifiers: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            max_increment_attempts: 1000,
            auto_fill_blank_identifiers: true,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
