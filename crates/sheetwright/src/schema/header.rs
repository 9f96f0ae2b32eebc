//! Sheet column headers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named column of the active sheet.
///
/// Headers are immutable once a sheet is loaded; a sheet switch replaces the
/// whole list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    /// Display text of the header cell.
    pub name: String,
    /// Zero-based column position.
    pub position: usize,
}

impl Header {
    /// Create a header.
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }

    /// Build positioned headers from header cell texts in column order.
    pub fn from_names<I, S>(names: I) -> Vec<Header>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(position, name)| Header::new(name, position))
            .collect()
    }

    /// Lowercased header text, used for marker and token matching.
    pub fn folded(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
