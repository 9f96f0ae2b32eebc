//! The add/edit state machine and the row operations built on it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{RuleOverride, SheetwrightConfig};
use crate::duplicate::{has_reject, DuplicateIndex, DuplicatePolicyEngine, DuplicateVerdict, Verdicts};
use crate::error::{Result, SheetwrightError};
use crate::inference::HeaderRuleInferer;
use crate::schema::{DuplicatePolicy, FieldRule, FieldType, Header, Row, RuleSet};
use crate::store::SheetStore;
use crate::validation::{ErrorKind, RowContext, ValidationEngine, ValidationResult};

use super::increment::{next_free_identifier, Increment};
use super::session::{EditSession, Mode};

/// Outcome of a commit or a duplicate.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitResult {
    /// True iff the row was written to the store.
    pub success: bool,
    /// Per-field validation outcome, including the normalized values.
    pub validation: ValidationResult,
    /// Verdict per policy-checked header.
    pub duplicates: Verdicts,
    /// Index the row was written at, on success.
    pub applied_row_index: Option<usize>,
}

impl CommitResult {
    /// Every problem per header, in column order.
    ///
    /// A validation error wins over a duplicate verdict on the same field.
    pub fn issues(&self) -> IndexMap<Header, ErrorKind> {
        let mut issues = IndexMap::new();
        for (header, error) in &self.validation.field_errors {
            let kind = error.or_else(|| self.duplicates.get(header).and_then(|v| v.error_kind()));
            if let Some(kind) = kind {
                issues.insert(header.clone(), kind);
            }
        }
        issues
    }

    /// The problem reported for the first header with this name, if any.
    pub fn issue_by_name(&self, name: &str) -> Option<ErrorKind> {
        self.issues()
            .into_iter()
            .find(|(h, _)| h.name == name)
            .map(|(_, kind)| kind)
    }

    /// True if any field collided under a Warn policy.
    pub fn has_warnings(&self) -> bool {
        self.duplicates.values().any(|v| *v == DuplicateVerdict::Warn)
    }

    /// One display message per problem field, in column order.
    pub fn messages(&self, rules: &RuleSet) -> Vec<String> {
        self.issues()
            .iter()
            .map(|(header, kind)| {
                let field_type = rules.get(header).map(|r| r.field_type).unwrap_or_default();
                kind.message(header, field_type)
            })
            .collect()
    }
}

/// Outcome of deleting a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// Index the row occupied before deletion.
    pub removed_index: usize,
    /// Pre-deletion index of the row that should take focus: the next row,
    /// else the previous row, else none when the sheet is now empty.
    pub suggested_focus_index: Option<usize>,
    /// True if the deleted row was under edit and the edit was cancelled.
    pub cancelled_edit: bool,
}

impl DeleteOutcome {
    /// The suggested focus row addressed in the post-deletion table.
    pub fn focus_after_delete(&self) -> Option<usize> {
        self.suggested_focus_index.map(|idx| {
            if idx > self.removed_index {
                idx - 1
            } else {
                idx
            }
        })
    }
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    Add,
    Edit(EditSession),
}

/// Orchestrates add, edit, duplicate, insert and delete against a
/// [`SheetStore`].
///
/// The controller owns the mode and the live edit session. It holds the
/// compiled rules for the active sheet's headers; the store itself stays with
/// the caller and is passed to each operation. All operations are
/// synchronous and assume exclusive access to the store for their duration.
#[derive(Debug, Clone, Default)]
pub struct RowLifecycleController {
    config: SheetwrightConfig,
    inferer: HeaderRuleInferer,
    validator: ValidationEngine,
    duplicates: DuplicatePolicyEngine,
    headers: Vec<Header>,
    rules: RuleSet,
    state: State,
}

impl RowLifecycleController {
    /// Create a controller with default configuration and no headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller with custom configuration.
    pub fn with_config(config: SheetwrightConfig) -> Self {
        Self {
            inferer: HeaderRuleInferer::with_config(config.rules.clone()),
            validator: ValidationEngine::with_config(config.validation.clone()),
            duplicates: DuplicatePolicyEngine::with_config(config.duplicates.clone()),
            config,
            headers: Vec::new(),
            rules: RuleSet::new(),
            state: State::Add,
        }
    }

    /// Create a controller and compile rules for `store`'s headers.
    pub fn for_store(config: SheetwrightConfig, store: &impl SheetStore) -> Self {
        let mut controller = Self::with_config(config);
        controller.infer_rules(store.headers());
        controller
    }

    /// The configuration in use.
    pub fn config(&self) -> &SheetwrightConfig {
        &self.config
    }

    /// Recompile every rule from `headers`, replacing the previous set.
    ///
    /// Call whenever the active sheet changes. Any live edit session refers
    /// to the old sheet and is cancelled.
    pub fn infer_rules(&mut self, headers: &[Header]) -> &RuleSet {
        if matches!(self.state, State::Edit(_)) {
            debug!("headers changed during edit, cancelling edit session");
            self.state = State::Add;
        }
        self.headers = headers.to_vec();
        self.rules = self.inferer.infer(&self.headers);
        &self.rules
    }

    /// Change one header's manual settings and recompile the rule set.
    pub fn set_rule_override(&mut self, header_name: impl Into<String>, rule: RuleOverride) -> &RuleSet {
        let header_name = header_name.into();
        if rule.is_empty() {
            self.config.rules.overrides.shift_remove(&header_name);
        } else {
            self.config.rules.overrides.insert(header_name, rule);
        }
        self.inferer = HeaderRuleInferer::with_config(self.config.rules.clone());
        self.rules = self.inferer.infer(&self.headers);
        &self.rules
    }

    /// The compiled rules for the active headers.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The current mode.
    pub fn mode(&self) -> Mode {
        match self.state {
            State::Add => Mode::Add,
            State::Edit(_) => Mode::Edit,
        }
    }

    /// The live edit session, present iff the mode is [`Mode::Edit`].
    pub fn edit_session(&self) -> Option<&EditSession> {
        match &self.state {
            State::Add => None,
            State::Edit(session) => Some(session),
        }
    }

    /// Switch to add mode, dropping any edit session.
    pub fn begin_add(&mut self) {
        if let State::Edit(session) = &self.state {
            debug!(row = session.target_row_index, "leaving edit mode");
        }
        self.state = State::Add;
    }

    /// Start editing row `index`, snapshotting its current values.
    ///
    /// Does not touch the store. Re-targets the session if already editing.
    pub fn begin_edit(&mut self, store: &impl SheetStore, index: usize) -> Result<&EditSession> {
        let out_of_range = SheetwrightError::RowOutOfRange {
            index,
            len: store.row_count(),
        };
        let Some(row) = store.row(index) else {
            return Err(out_of_range);
        };

        debug!(row = index, "entering edit mode");
        self.state = State::Edit(EditSession::capture(index, row, &self.rules));
        self.edit_session().ok_or(out_of_range)
    }

    /// Abandon the current edit, if any.
    pub fn cancel(&mut self) {
        self.begin_add();
    }

    /// Validate a candidate for the current mode without committing.
    ///
    /// Pure; the presentation layer may call this on every keystroke.
    pub fn validate(&self, candidate: &Row) -> ValidationResult {
        self.validator.validate(candidate, &self.rules, self.row_context())
    }

    /// Build the duplicate index for the current mode.
    ///
    /// Build once per pass and re-check candidates against it as often as
    /// needed.
    pub fn duplicate_index(&self, store: &impl SheetStore) -> DuplicateIndex {
        self.duplicates
            .index(store.rows(), &self.rules, self.edit_session())
    }

    /// Check a candidate's values for duplicates under the current mode.
    pub fn check_duplicates(&self, candidate: &Row, store: &impl SheetStore) -> Verdicts {
        self.duplicates
            .check_duplicates(candidate, store.rows(), &self.rules, self.edit_session())
    }

    /// Commit a candidate row.
    ///
    /// In add mode a passing row is appended. In edit mode it replaces the
    /// session's row, the session ends and the mode returns to add; a failing
    /// edit stays in edit mode. Nothing is written unless every field
    /// validates and no Strict collision exists.
    pub fn commit<S: SheetStore>(&mut self, store: &mut S, candidate: Row) -> Result<CommitResult> {
        self.check_width(&candidate)?;

        let session = self.edit_session().cloned();
        if let Some(session) = &session {
            if session.target_row_index >= store.row_count() {
                return Err(SheetwrightError::RowOutOfRange {
                    index: session.target_row_index,
                    len: store.row_count(),
                });
            }
        }

        let index = self.duplicates.index(store.rows(), &self.rules, session.as_ref());

        let mut candidate = candidate;
        let mut exhausted = Vec::new();
        if session.is_none() && self.config.lifecycle.auto_fill_blank_identifiers {
            exhausted = self.fill_blank_identifiers(&mut candidate, store.rows(), &index);
        }

        let validation = self.validator.validate(&candidate, &self.rules, self.row_context());
        let mut duplicates = index.check(&validation.normalized, session.as_ref());
        for header in exhausted {
            duplicates.insert(header, DuplicateVerdict::Reject);
        }

        let success = validation.is_valid && !has_reject(&duplicates);
        if !success {
            debug!(
                mode = %self.mode(),
                errors = validation.error_count(),
                "commit rejected"
            );
            return Ok(CommitResult {
                success,
                validation,
                duplicates,
                applied_row_index: None,
            });
        }

        log_warnings(&duplicates);

        let applied = match session {
            Some(session) => {
                let target = session.target_row_index;
                store.replace_row(target, validation.normalized.clone())?;
                info!(row = target, "updated row");
                self.state = State::Add;
                target
            }
            None => {
                let idx = store.append_row(validation.normalized.clone());
                info!(row = idx, "appended row");
                idx
            }
        };

        Ok(CommitResult {
            success,
            validation,
            duplicates,
            applied_row_index: Some(applied),
        })
    }

    /// Copy row `index`, step its identifiers, and insert the copy directly
    /// below the source.
    ///
    /// The copy goes through the same checks as an add. Identifier fields
    /// (`unique` text rules) with a trailing number are incremented, skipping
    /// values already taken under a Strict policy; if no free value is found
    /// within the attempt budget the field reports
    /// [`ErrorKind::DuplicateConflict`] and nothing is inserted.
    pub fn duplicate_row<S: SheetStore>(&mut self, store: &mut S, index: usize) -> Result<CommitResult> {
        let source = store.row(index).ok_or(SheetwrightError::RowOutOfRange {
            index,
            len: store.row_count(),
        })?;

        let mut candidate = source.clone();
        candidate.pad_to(self.rules.len());
        self.check_width(&candidate)?;

        let dup_index = self.duplicates.index(store.rows(), &self.rules, None);
        let max_attempts = self.config.lifecycle.max_increment_attempts;
        let mut exhausted = Vec::new();

        for (header, rule) in self.rules.iter().filter(|(_, r)| is_identifier(r)) {
            let strict = rule.duplicate_policy == DuplicatePolicy::Strict;
            let current = candidate.value(header).to_string();
            let is_taken = |v: &str| strict && dup_index.contains(header, v);

            match next_free_identifier(&current, is_taken, max_attempts) {
                Increment::Found(next) => {
                    debug!(header = %header.name, from = %current, to = %next, "incremented identifier");
                    candidate.set(header.position, next);
                }
                Increment::NotApplicable => {}
                Increment::Exhausted { last, attempts } => {
                    warn!(header = %header.name, last = %last, attempts, "no free identifier");
                    exhausted.push(header.clone());
                }
            }
        }

        let validation = self.validator.validate(&candidate, &self.rules, RowContext::New);
        let mut duplicates = dup_index.check(&validation.normalized, None);
        for header in exhausted {
            duplicates.insert(header, DuplicateVerdict::Reject);
        }

        let success = validation.is_valid && !has_reject(&duplicates);
        let mut applied_row_index = None;

        if success {
            log_warnings(&duplicates);
            let new_index = index + 1;
            store.insert_row(new_index, validation.normalized.clone())?;
            self.shift_session_on_insert(new_index);
            info!(source = index, row = new_index, "duplicated row");
            applied_row_index = Some(new_index);
        } else {
            debug!(source = index, "duplicate rejected");
        }

        Ok(CommitResult {
            success,
            validation,
            duplicates,
            applied_row_index,
        })
    }

    /// Insert an empty row directly below `index` and return its index.
    ///
    /// The blank row is not validated; it is a valid transient state until a
    /// caller commits values into it via edit. On an empty sheet, index 0
    /// inserts the first row.
    pub fn insert_blank_row<S: SheetStore>(&mut self, store: &mut S, index: usize) -> Result<usize> {
        let len = store.row_count();
        let new_index = if len == 0 && index == 0 {
            0
        } else if index < len {
            index + 1
        } else {
            return Err(SheetwrightError::RowOutOfRange { index, len });
        };

        store.insert_row(new_index, Row::blank(store.headers().len()))?;
        self.shift_session_on_insert(new_index);
        info!(row = new_index, "inserted blank row");
        Ok(new_index)
    }

    /// Remove row `index` unconditionally.
    ///
    /// Deleting the row under edit cancels the edit; deleting a row above it
    /// keeps the session pointed at the same record.
    pub fn delete_row<S: SheetStore>(&mut self, store: &mut S, index: usize) -> Result<DeleteOutcome> {
        let len = store.row_count();
        store.remove_row(index)?;

        let suggested_focus_index = if index + 1 < len {
            Some(index + 1)
        } else if index > 0 {
            Some(index - 1)
        } else {
            None
        };

        let mut cancelled_edit = false;
        if let State::Edit(session) = &mut self.state {
            if session.target_row_index == index {
                cancelled_edit = true;
            } else if session.target_row_index > index {
                session.target_row_index -= 1;
            }
        }
        if cancelled_edit {
            debug!(row = index, "row under edit deleted, leaving edit mode");
            self.state = State::Add;
        }

        info!(row = index, "deleted row");
        Ok(DeleteOutcome {
            removed_index: index,
            suggested_focus_index,
            cancelled_edit,
        })
    }

    fn row_context(&self) -> RowContext {
        match &self.state {
            State::Add => RowContext::New,
            State::Edit(session) => RowContext::Existing(session.target_row_index),
        }
    }

    fn check_width(&self, candidate: &Row) -> Result<()> {
        if candidate.len() > self.rules.len() {
            return Err(SheetwrightError::ColumnMismatch {
                expected: self.rules.len(),
                found: candidate.len(),
            });
        }
        Ok(())
    }

    fn shift_session_on_insert(&mut self, inserted_at: usize) {
        if let State::Edit(session) = &mut self.state {
            if session.target_row_index >= inserted_at {
                session.target_row_index += 1;
            }
        }
    }

    /// Fill blank required identifier fields from the column's last value.
    ///
    /// Returns the headers for which no free value was found.
    fn fill_blank_identifiers(
        &self,
        candidate: &mut Row,
        existing: &[Row],
        index: &DuplicateIndex,
    ) -> Vec<Header> {
        let max_attempts = self.config.lifecycle.max_increment_attempts;
        let mut exhausted = Vec::new();

        for (header, rule) in self.rules.iter().filter(|(_, r)| is_identifier(r) && r.required) {
            if !candidate.value(header).trim().is_empty() {
                continue;
            }
            let Some(last) = existing
                .iter()
                .rev()
                .map(|row| row.value(header).trim())
                .find(|v| !v.is_empty())
            else {
                continue;
            };

            let strict = rule.duplicate_policy == DuplicatePolicy::Strict;
            match next_free_identifier(last, |v| strict && index.contains(header, v), max_attempts) {
                Increment::Found(next) => {
                    debug!(header = %header.name, value = %next, "filled blank identifier");
                    candidate.set(header.position, next);
                }
                Increment::NotApplicable => {}
                Increment::Exhausted { last, attempts } => {
                    warn!(header = %header.name, last = %last, attempts, "no free identifier");
                    exhausted.push(header.clone());
                }
            }
        }

        exhausted
    }
}

/// Unique text fields hold identifiers; typed unique fields (dates,
/// amounts) are never incremented.
fn is_identifier(rule: &FieldRule) -> bool {
    rule.unique && rule.field_type == FieldType::Text
}

fn log_warnings(duplicates: &Verdicts) {
    for (header, verdict) in duplicates {
        if *verdict == DuplicateVerdict::Warn {
            warn!(header = %header.name, "committing possible duplicate value");
        }
    }
}
