//! The sheet store abstraction and its in-memory implementation.

use crate::error::{Result, SheetwrightError};
use crate::schema::{Header, Row};

/// An ordered table of headers and rows.
///
/// The row lifecycle only reads headers and row snapshots through this
/// trait and writes back rows that passed validation. Index arguments address
/// rows in append order.
pub trait SheetStore {
    /// Column headers of the active sheet.
    fn headers(&self) -> &[Header];

    /// All rows in storage order.
    fn rows(&self) -> &[Row];

    /// Number of rows.
    fn row_count(&self) -> usize {
        self.rows().len()
    }

    /// Get a row by index.
    fn row(&self, index: usize) -> Option<&Row> {
        self.rows().get(index)
    }

    /// Append a row and return its index.
    fn append_row(&mut self, row: Row) -> usize;

    /// Replace the row at `index`.
    fn replace_row(&mut self, index: usize, row: Row) -> Result<()>;

    /// Insert a row so that it ends up at `index` (`index <= row_count`).
    fn insert_row(&mut self, index: usize, row: Row) -> Result<()>;

    /// Remove and return the row at `index`.
    fn remove_row(&mut self, index: usize) -> Result<Row>;
}

/// In-memory sheet: a name, headers and rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// Sheet name.
    pub name: String,
    headers: Vec<Header>,
    rows: Vec<Row>,
}

impl Sheet {
    /// Create an empty sheet with the given header texts.
    pub fn new<I, S>(name: impl Into<String>, header_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            headers: Header::from_names(header_names),
            rows: Vec::new(),
        }
    }

    /// Create a sheet with rows; short rows are padded with empty cells.
    pub fn with_rows(
        name: impl Into<String>,
        headers: Vec<Header>,
        rows: Vec<Row>,
    ) -> Result<Self> {
        let width = headers.len();
        let mut padded = Vec::with_capacity(rows.len());
        for mut row in rows {
            if row.len() > width {
                return Err(SheetwrightError::ColumnMismatch {
                    expected: width,
                    found: row.len(),
                });
            }
            row.pad_to(width);
            padded.push(row);
        }

        Ok(Self {
            name: name.into(),
            headers,
            rows: padded,
        })
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).map(|r| r.get(col))
    }

    /// Get all values for a column by position.
    pub fn column_values(&self, position: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row.get(position))
    }

    fn fit(&self, mut row: Row) -> Result<Row> {
        if row.len() > self.headers.len() {
            return Err(SheetwrightError::ColumnMismatch {
                expected: self.headers.len(),
                found: row.len(),
            });
        }
        row.pad_to(self.headers.len());
        Ok(row)
    }

    fn out_of_range(&self, index: usize) -> SheetwrightError {
        SheetwrightError::RowOutOfRange {
            index,
            len: self.rows.len(),
        }
    }
}

impl SheetStore for Sheet {
    fn headers(&self) -> &[Header] {
        &self.headers
    }

    fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn append_row(&mut self, mut row: Row) -> usize {
        row.pad_to(self.headers.len());
        self.rows.push(row);
        self.rows.len() - 1
    }

    fn replace_row(&mut self, index: usize, row: Row) -> Result<()> {
        if index >= self.rows.len() {
            return Err(self.out_of_range(index));
        }
        self.rows[index] = self.fit(row)?;
        Ok(())
    }

    fn insert_row(&mut self, index: usize, row: Row) -> Result<()> {
        if index > self.rows.len() {
            return Err(self.out_of_range(index));
        }
        let row = self.fit(row)?;
        self.rows.insert(index, row);
        Ok(())
    }

    fn remove_row(&mut self, index: usize) -> Result<Row> {
        if index >= self.rows.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.rows.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Sheet {
        Sheet::with_rows(
            "Orders",
            Header::from_names(["ID", "Name"]),
            vec![Row::new(["ID001", "Alice"]), Row::new(["ID002"])],
        )
        .unwrap()
    }

    #[test]
    fn test_with_rows_pads() {
        let sheet = sheet();
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.row(1).unwrap().len(), 2);
        assert_eq!(sheet.get(1, 1), Some(""));
        assert_eq!(sheet.column_values(0).collect::<Vec<_>>(), vec!["ID001", "ID002"]);
    }

    #[test]
    fn test_with_rows_rejects_wide_row() {
        let result = Sheet::with_rows("S", Header::from_names(["A"]), vec![Row::new(["1", "2"])]);
        assert!(matches!(
            result,
            Err(SheetwrightError::ColumnMismatch { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn test_mutations() {
        let mut sheet = sheet();
        assert_eq!(sheet.append_row(Row::new(["ID003", "Carol"])), 2);

        sheet.insert_row(1, Row::blank(2)).unwrap();
        assert!(sheet.row(1).unwrap().is_blank());

        sheet.replace_row(1, Row::new(["ID009", "Zed"])).unwrap();
        assert_eq!(sheet.get(1, 0), Some("ID009"));

        let removed = sheet.remove_row(0).unwrap();
        assert_eq!(removed.get(0), "ID001");
        assert_eq!(sheet.row_count(), 3);
    }

    #[test]
    fn test_out_of_range() {
        let mut sheet = sheet();
        assert!(matches!(
            sheet.remove_row(5),
            Err(SheetwrightError::RowOutOfRange { index: 5, len: 2 })
        ));
        assert!(sheet.insert_row(2, Row::blank(2)).is_ok());
        assert!(sheet.insert_row(9, Row::blank(2)).is_err());
        assert!(sheet.replace_row(3, Row::blank(2)).is_err());
    }
}
