//! Per-column value sets built once per validation pass.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::lifecycle::EditSession;
use crate::schema::{DuplicatePolicy, Header, Row, RuleSet};
use crate::validation::normalize;

use super::engine::{DuplicateVerdict, Verdicts};

#[derive(Debug, Clone)]
struct ColumnValues {
    policy: DuplicatePolicy,
    values: HashSet<String>,
}

/// Existing values of every policy-checked column, keyed for comparison.
///
/// Building the index is one scan over the existing rows; each check after
/// that is a set lookup per column, so the presentation layer can re-check on
/// every keystroke without rescanning the table.
#[derive(Debug, Clone)]
pub struct DuplicateIndex {
    case_sensitive: bool,
    excluded_row: Option<usize>,
    columns: IndexMap<Header, ColumnValues>,
}

impl DuplicateIndex {
    /// Scan `existing` for every header whose policy is not `None`, skipping
    /// `excluded_row` (the row under edit).
    pub fn build(
        existing: &[Row],
        rules: &RuleSet,
        excluded_row: Option<usize>,
        case_sensitive: bool,
    ) -> Self {
        let mut columns: IndexMap<Header, ColumnValues> = rules
            .checked_headers()
            .map(|(header, rule)| {
                (
                    header.clone(),
                    ColumnValues {
                        policy: rule.duplicate_policy,
                        values: HashSet::with_capacity(existing.len()),
                    },
                )
            })
            .collect();

        for (row_idx, row) in existing.iter().enumerate() {
            if Some(row_idx) == excluded_row {
                continue;
            }
            for (header, column) in columns.iter_mut() {
                let key = comparison_key(row.value(header), case_sensitive);
                if !key.is_empty() {
                    column.values.insert(key);
                }
            }
        }

        Self {
            case_sensitive,
            excluded_row,
            columns,
        }
    }

    /// The row left out of the index, if any.
    pub fn excluded_row(&self) -> Option<usize> {
        self.excluded_row
    }

    /// Returns true if `value` already exists in the column of `header`.
    ///
    /// Always false for headers that are not policy-checked.
    pub fn contains(&self, header: &Header, value: &str) -> bool {
        let key = comparison_key(value, self.case_sensitive);
        !key.is_empty()
            && self
                .columns
                .get(header)
                .is_some_and(|column| column.values.contains(&key))
    }

    /// Record a value as taken, e.g. after committing a row.
    pub fn insert(&mut self, header: &Header, value: &str) {
        let key = comparison_key(value, self.case_sensitive);
        if key.is_empty() {
            return;
        }
        if let Some(column) = self.columns.get_mut(header) {
            column.values.insert(key);
        }
    }

    /// Verdict per checked header for `candidate`.
    ///
    /// Empty values are never duplicates. With a `session`, a value equal to
    /// that header's pre-edit value is accepted as well.
    pub fn check(&self, candidate: &Row, session: Option<&EditSession>) -> Verdicts {
        let mut verdicts = Verdicts::with_capacity(self.columns.len());

        for (header, column) in &self.columns {
            let key = comparison_key(candidate.value(header), self.case_sensitive);

            let unchanged = session
                .and_then(|s| s.original_value(header))
                .is_some_and(|orig| comparison_key(orig, self.case_sensitive) == key);

            let verdict = if key.is_empty() || unchanged || !column.values.contains(&key) {
                DuplicateVerdict::Ok
            } else {
                debug!(header = %header.name, policy = column.policy.label(), "duplicate value");
                DuplicateVerdict::for_policy(column.policy)
            };

            verdicts.insert(header.clone(), verdict);
        }

        verdicts
    }

    /// Number of policy-checked columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

fn comparison_key(value: &str, case_sensitive: bool) -> String {
    let normalized = normalize(value);
    if case_sensitive {
        normalized
    } else {
        normalized.to_lowercase()
    }
}
