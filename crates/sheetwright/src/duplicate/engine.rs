//! Duplicate policy evaluation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::DuplicateConfig;
use crate::lifecycle::EditSession;
use crate::schema::{DuplicatePolicy, Header, Row, RuleSet};
use crate::validation::ErrorKind;

use super::index::DuplicateIndex;

/// Result of checking one field against existing column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateVerdict {
    /// No collision.
    Ok,
    /// Collision under a Warn policy; the commit may proceed.
    Warn,
    /// Collision under a Strict policy; the commit is blocked.
    Reject,
}

impl DuplicateVerdict {
    /// Verdict for a collision under `policy`.
    pub fn for_policy(policy: DuplicatePolicy) -> Self {
        match policy {
            DuplicatePolicy::Strict => DuplicateVerdict::Reject,
            DuplicatePolicy::Warn => DuplicateVerdict::Warn,
            DuplicatePolicy::None => DuplicateVerdict::Ok,
        }
    }

    /// The error kind this verdict reports, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            DuplicateVerdict::Ok => None,
            DuplicateVerdict::Warn => Some(ErrorKind::DuplicateWarning),
            DuplicateVerdict::Reject => Some(ErrorKind::DuplicateConflict),
        }
    }
}

/// Verdict per policy-checked header, in column order.
///
/// Headers whose policy is `None` are not evaluated and have no entry.
pub type Verdicts = IndexMap<Header, DuplicateVerdict>;

/// Checks candidate values against existing column values under each
/// header's duplicate policy.
#[derive(Debug, Clone, Default)]
pub struct DuplicatePolicyEngine {
    config: DuplicateConfig,
}

impl DuplicatePolicyEngine {
    /// Create an engine with case-insensitive comparison.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom settings.
    pub fn with_config(config: DuplicateConfig) -> Self {
        Self { config }
    }

    /// Build the comparison sets for one validation pass.
    ///
    /// With an edit `session`, the row under edit is left out so a row is
    /// never a duplicate of itself.
    pub fn index(
        &self,
        existing: &[Row],
        rules: &RuleSet,
        session: Option<&EditSession>,
    ) -> DuplicateIndex {
        DuplicateIndex::build(
            existing,
            rules,
            session.map(|s| s.target_row_index),
            self.config.case_sensitive,
        )
    }

    /// Check `candidate` against `existing` in one pass.
    pub fn check_duplicates(
        &self,
        candidate: &Row,
        existing: &[Row],
        rules: &RuleSet,
        session: Option<&EditSession>,
    ) -> Verdicts {
        self.index(existing, rules, session).check(candidate, session)
    }
}

/// Returns true if any verdict blocks a commit.
pub(crate) fn has_reject(verdicts: &Verdicts) -> bool {
    verdicts.values().any(|v| *v == DuplicateVerdict::Reject)
}
