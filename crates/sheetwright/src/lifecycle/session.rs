//! Controller mode and edit-session state.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::{Header, Row, RuleSet};

/// Which kind of commit the controller performs next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Commits append a new row.
    #[default]
    Add,
    /// Commits replace the row held by the live edit session.
    Edit,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Add => f.write_str("add"),
            Mode::Edit => f.write_str("edit"),
        }
    }
}

/// The row under edit and its values at the moment editing began.
///
/// Lives exactly as long as the controller is in [`Mode::Edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Index of the persisted row being edited.
    pub target_row_index: usize,
    /// Pre-edit value per header.
    pub original_values: IndexMap<Header, String>,
}

impl EditSession {
    /// Snapshot `row` (stored at `index`) for every header in `rules`.
    pub fn capture(index: usize, row: &Row, rules: &RuleSet) -> Self {
        Self {
            target_row_index: index,
            original_values: rules
                .headers()
                .map(|h| (h.clone(), row.value(h).to_string()))
                .collect(),
        }
    }

    /// The pre-edit value of a header.
    pub fn original_value(&self, header: &Header) -> Option<&str> {
        self.original_values.get(header).map(|s| s.as_str())
    }

    /// The pre-edit values as a row.
    pub fn original_row(&self) -> Row {
        let mut row = Row::blank(self.original_values.len());
        for (header, value) in &self.original_values {
            row.set(header.position, value.as_str());
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldRule;

    #[test]
    fn test_capture() {
        let headers = Header::from_names(["ID", "Name"]);
        let rules = RuleSet::from_rules(headers.iter().cloned().map(|h| (h, FieldRule::text())));
        let row = Row::new(["ID001", "Alice"]);

        let session = EditSession::capture(4, &row, &rules);
        assert_eq!(session.target_row_index, 4);
        assert_eq!(session.original_value(&headers[1]), Some("Alice"));
        assert_eq!(session.original_row(), row);
    }

    #[test]
    fn test_default_mode_is_add() {
        assert_eq!(Mode::default(), Mode::Add);
        assert_eq!(Mode::Edit.to_string(), "edit");
    }
}
