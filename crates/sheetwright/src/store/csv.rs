//! Delimited-text persistence for [`Sheet`].

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SheetwrightError};
use crate::schema::{Header, Row};

use super::sheet::{Sheet, SheetStore};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Options for reading and writing delimited sheets.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Delimiter to use (None = auto-detect on read, comma on write).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
        }
    }
}

impl Sheet {
    /// Read a sheet from a delimited file; the first record is the header row.
    ///
    /// The sheet is named after the file stem.
    pub fn read_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| SheetwrightError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let sheet = Self::from_csv_bytes(name, &bytes, options)?;
        debug!(
            path = %path.display(),
            headers = sheet.column_count(),
            rows = sheet.row_count(),
            "loaded sheet"
        );
        Ok(sheet)
    }

    /// Parse a sheet from delimited bytes.
    ///
    /// A leading UTF-8 byte order mark is ignored. Records wider than the
    /// header row are accepted only if the extra cells are empty.
    pub fn from_csv_bytes(name: impl Into<String>, bytes: &[u8], options: &CsvOptions) -> Result<Self> {
        let bytes = strip_bom(bytes);
        let delimiter = match options.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(options.quote)
            .flexible(true)
            .from_reader(bytes);

        let header_names: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        if header_names.iter().all(|h| h.trim().is_empty()) {
            return Err(SheetwrightError::EmptyData("No headers found".to_string()));
        }

        let headers = Header::from_names(header_names);
        let width = headers.len();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut values: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            while values.len() > width && values.last().is_some_and(|v| v.trim().is_empty()) {
                values.pop();
            }
            if values.len() > width {
                debug!(
                    line = record.position().map(|p| p.line()),
                    cells = values.len(),
                    "record wider than header row"
                );
                return Err(SheetwrightError::ColumnMismatch {
                    expected: width,
                    found: values.len(),
                });
            }
            rows.push(Row::from(values));
        }

        Sheet::with_rows(name, headers, rows)
    }

    /// Write the sheet, header row first.
    pub fn write_csv(&self, path: impl AsRef<Path>, options: &CsvOptions) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| SheetwrightError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter.unwrap_or(b','))
            .quote(options.quote)
            .from_writer(BufWriter::new(file));

        writer.write_record(self.headers().iter().map(|h| h.name.as_str()))?;
        for row in self.rows() {
            writer.write_record(row.values())?;
        }
        writer.flush().map_err(|e| SheetwrightError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(path = %path.display(), rows = self.row_count(), "saved sheet");
        Ok(())
    }
}

/// Detect the delimiter by analyzing the first few lines.
pub fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(strip_bom(bytes));
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(SheetwrightError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent counts across lines beat raw frequency.
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Spreadsheet exports often start with a UTF-8 byte order mark.
fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter(b"a,b,c\n1,2,3\n4,5,6").unwrap(), b',');
        assert_eq!(detect_delimiter(b"a\tb\tc\n1\t2\t3").unwrap(), b'\t');
        assert_eq!(detect_delimiter(b"a;b\n\"x;y\";2").unwrap(), b';');
        assert!(detect_delimiter(b"\n\n").is_err());
    }

    #[test]
    fn test_from_csv_bytes() {
        let data = b"ID,Name,Notes\nID001,Alice\nID002,Bob,hi,,\n";
        let sheet = Sheet::from_csv_bytes("orders", data, &CsvOptions::default()).unwrap();

        assert_eq!(sheet.name, "orders");
        assert_eq!(sheet.column_count(), 3);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.get(0, 2), Some(""));
        assert_eq!(sheet.get(1, 2), Some("hi"));
        assert_eq!(sheet.row(1).unwrap().len(), 3);
    }

    #[test]
    fn test_extra_cells_are_not_dropped() {
        let data = b"ID,Name\nID001,Alice,keep-me\n";
        let result = Sheet::from_csv_bytes("orders", data, &CsvOptions::default());
        assert!(matches!(
            result,
            Err(SheetwrightError::ColumnMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let data = b"\xEF\xBB\xBFID;Name\nID001;Alice\n";
        assert_eq!(detect_delimiter(data).unwrap(), b';');

        let sheet = Sheet::from_csv_bytes("orders", data, &CsvOptions::default()).unwrap();
        assert_eq!(sheet.headers()[0].name, "ID");
        assert_eq!(sheet.get(0, 1), Some("Alice"));
    }

    #[test]
    fn test_headers_only_sheet() {
        let sheet = Sheet::from_csv_bytes("s", b"ID,Name\n", &CsvOptions::default()).unwrap();
        assert_eq!(sheet.row_count(), 0);
        assert_eq!(sheet.headers()[1].name, "Name");
    }
}
