//! Compiles header display text into per-column rules.

use tracing::debug;

use crate::config::RuleConfig;
use crate::schema::{DuplicatePolicy, FieldRule, FieldType, Header, RuleSet};

/// Derives a [`FieldRule`] for every header from its text.
///
/// Inference is a pure function of the header list and the configured token
/// sets. It is re-run over the full header list whenever the active sheet
/// changes.
#[derive(Debug, Clone, Default)]
pub struct HeaderRuleInferer {
    config: RuleConfig,
}

impl HeaderRuleInferer {
    /// Create an inferer with the default token sets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an inferer with custom token sets.
    pub fn with_config(config: RuleConfig) -> Self {
        Self { config }
    }

    /// The token configuration in use.
    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Compile rules for all headers, in column order.
    pub fn infer(&self, headers: &[Header]) -> RuleSet {
        let last = headers.len().checked_sub(1);

        let rules = RuleSet::from_rules(headers.iter().enumerate().map(|(idx, header)| {
            let rule = self.infer_header(header, Some(idx) == last);
            debug!(
                header = %header.name,
                field_type = %rule.field_type,
                required = rule.required,
                unique = rule.unique,
                policy = rule.duplicate_policy.label(),
                "inferred field rule"
            );
            (header.clone(), rule)
        }));

        debug!(headers = rules.len(), "compiled rule set");
        rules
    }

    /// Compile the rule for a single header.
    ///
    /// `trailing` marks the sheet's last column, which is optional by default
    /// when so configured.
    pub fn infer_header(&self, header: &Header, trailing: bool) -> FieldRule {
        let folded = header.folded();
        let cfg = &self.config;

        let explicit_required = contains_any(&folded, &cfg.required_markers);
        let optional_marked = contains_any(&folded, &cfg.optional_markers);
        let strict_marked = contains_any(&folded, &cfg.unique_markers);
        let warn_marked = contains_any(&folded, &cfg.warn_markers);

        // Type and identifier tokens are matched against the text with
        // markers removed, so a marker never reads as a type keyword.
        let label = strip_markers(&folded, cfg);

        let field_type = self.infer_type(&label);

        let mut required = explicit_required || !optional_marked;
        if !explicit_required {
            if field_type == FieldType::Text && contains_any(&label, &cfg.optional_text_tokens) {
                required = false;
            }
            if trailing && cfg.trailing_column_optional {
                required = false;
            }
        }

        let unique = strict_marked || contains_any(&label, &cfg.identifier_tokens);

        let duplicate_policy = if warn_marked {
            DuplicatePolicy::Warn
        } else if unique {
            DuplicatePolicy::Strict
        } else {
            DuplicatePolicy::None
        };

        let mut rule = FieldRule {
            field_type,
            required,
            unique,
            duplicate_policy,
        };

        if let Some(ov) = cfg.overrides.get(&header.name) {
            if let Some(required) = ov.required {
                rule.required = required;
            }
            if let Some(policy) = ov.duplicate_policy {
                rule.duplicate_policy = policy;
            }
            if let Some(field_type) = ov.field_type {
                rule.field_type = field_type;
            }
        }

        rule
    }

    /// Resolve the field type; the first matching token group wins.
    fn infer_type(&self, label: &str) -> FieldType {
        let cfg = &self.config;

        if contains_any(label, &cfg.date_tokens) {
            FieldType::Date
        } else if contains_any(label, &cfg.email_tokens) {
            FieldType::Email
        } else if contains_any(label, &cfg.decimal_tokens) {
            FieldType::Decimal {
                scale: cfg.decimal_places,
            }
        } else if contains_any(label, &cfg.integer_tokens) {
            FieldType::Integer
        } else {
            FieldType::Text
        }
    }
}

fn contains_any(text: &str, tokens: &[String]) -> bool {
    tokens
        .iter()
        .any(|t| !t.is_empty() && text.contains(t.to_lowercase().as_str()))
}

fn strip_markers(folded: &str, cfg: &RuleConfig) -> String {
    let mut label = folded.to_string();
    for marker in cfg
        .required_markers
        .iter()
        .chain(&cfg.unique_markers)
        .chain(&cfg.warn_markers)
    {
        if !marker.is_empty() {
            label = label.replace(marker.to_lowercase().as_str(), " ");
        }
    }
    label
}
