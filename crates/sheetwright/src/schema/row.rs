//! Row values keyed by header position.

use serde::{Deserialize, Serialize};

use super::header::Header;

/// An ordered set of raw cell values, one per header.
///
/// The same type is used for persisted rows (addressed by index in a
/// [`crate::SheetStore`]) and candidate rows that have not been committed.
/// Missing trailing cells read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    /// Create a row from cell values in column order.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// A row of `width` empty cells.
    pub fn blank(width: usize) -> Self {
        Self {
            values: vec![String::new(); width],
        }
    }

    /// Build a row for `headers` from `(header name, value)` pairs.
    ///
    /// Headers not named in `pairs` are left empty; names that match no
    /// header are ignored.
    pub fn from_pairs<'a, I>(headers: &[Header], pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut row = Row::blank(headers.len());
        for (name, value) in pairs {
            if let Some(header) = headers.iter().find(|h| h.name == name) {
                row.set(header.position, value);
            }
        }
        row
    }

    /// Number of cells held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row holds no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if every cell is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|v| v.trim().is_empty())
    }

    /// Get the value at a column position ("" if absent).
    pub fn get(&self, position: usize) -> &str {
        self.values.get(position).map(|s| s.as_str()).unwrap_or("")
    }

    /// Get the value for a header.
    pub fn value(&self, header: &Header) -> &str {
        self.get(header.position)
    }

    /// Set the value at a column position, growing the row if needed.
    pub fn set(&mut self, position: usize, value: impl Into<String>) {
        if position >= self.values.len() {
            self.values.resize(position + 1, String::new());
        }
        self.values[position] = value.into();
    }

    /// Pad with empty cells up to `width`.
    pub fn pad_to(&mut self, width: usize) {
        if self.values.len() < width {
            self.values.resize(width, String::new());
        }
    }

    /// Borrow the cell values.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Consume the row and return its cell values.
    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}

impl From<Vec<String>> for Row {
    fn from(values: Vec<String>) -> Self {
        Self { values }
    }
}
