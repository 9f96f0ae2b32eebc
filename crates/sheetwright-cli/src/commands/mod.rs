//! CLI command implementations.

pub mod add;
pub mod edit;
pub mod rows;
pub mod rules;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use sheetwright::store::detect_delimiter;
use sheetwright::{
    CommitResult, CsvOptions, DuplicateVerdict, ErrorKind, Header, Row, RowLifecycleController,
    Sheet, SheetStore, SheetwrightConfig,
};

/// A sheet loaded from disk together with a controller for its headers.
pub struct Workspace {
    pub path: PathBuf,
    pub sheet: Sheet,
    pub controller: RowLifecycleController,
    options: CsvOptions,
}

impl Workspace {
    /// Load the configuration (or defaults) and the sheet at `file`.
    pub fn open(file: PathBuf, config: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        if !file.exists() {
            return Err(format!("Sheet not found: {}", file.display()).into());
        }

        let config = match config {
            Some(path) => SheetwrightConfig::load(path)?,
            None => SheetwrightConfig::default(),
        };

        let bytes = fs::read(&file)?;
        // Saves keep whatever delimiter the file was written with.
        let options = CsvOptions {
            delimiter: Some(detect_delimiter(&bytes)?),
            ..CsvOptions::default()
        };
        let name = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sheet = Sheet::from_csv_bytes(name, &bytes, &options)?;

        let controller = RowLifecycleController::for_store(config, &sheet);
        Ok(Self {
            path: file,
            sheet,
            controller,
            options,
        })
    }

    /// Persist the sheet back to its file.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.sheet.write_csv(&self.path, &self.options)?;
        Ok(())
    }
}

/// Parse `HEADER=VALUE` arguments against the sheet's headers.
pub fn parse_assignments<'a>(
    headers: &[Header],
    values: &'a [String],
) -> Result<Vec<(&'a str, &'a str)>, Box<dyn std::error::Error>> {
    let mut pairs = Vec::with_capacity(values.len());
    for raw in values {
        let (name, value) = raw
            .split_once('=')
            .ok_or_else(|| format!("Expected HEADER=VALUE, got '{}'", raw))?;
        if !headers.iter().any(|h| h.name == name) {
            let known: Vec<&str> = headers.iter().map(|h| h.name.as_str()).collect();
            return Err(format!("Unknown header '{}'. Headers: {}", name, known.join(", ")).into());
        }
        pairs.push((name, value));
    }
    Ok(pairs)
}

/// Overlay assignments on a copy of `base`.
pub fn apply_assignments(headers: &[Header], base: &Row, pairs: &[(&str, &str)]) -> Row {
    let mut row = base.clone();
    row.pad_to(headers.len());
    for (name, value) in pairs {
        if let Some(header) = headers.iter().find(|h| h.name == *name) {
            row.set(header.position, *value);
        }
    }
    row
}

/// Print the outcome of a commit-like operation.
pub fn print_commit(result: &CommitResult, controller: &RowLifecycleController, action: &str) {
    if result.success {
        let index = result
            .applied_row_index
            .map(|i| i.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!("{} {} row {}", "✓".green().bold(), action, index.white().bold());
        print_row(controller, &result.validation.normalized);
    } else {
        println!("{} {} rejected", "✗".red().bold(), action);
    }

    for (header, kind) in result.issues() {
        let field_type = controller
            .rules()
            .get(&header)
            .map(|r| r.field_type)
            .unwrap_or_default();
        let message = kind.message(&header, field_type);
        println!("  {} {}", severity_tag(kind), message);
    }
}

/// Print a row as `header: value` lines.
pub fn print_row(controller: &RowLifecycleController, row: &Row) {
    for header in controller.rules().headers() {
        println!("  {}: {}", header.name.dimmed(), row.value(header));
    }
}

/// A colored tag for an error kind.
pub fn severity_tag(kind: ErrorKind) -> colored::ColoredString {
    if kind.is_blocking() {
        format!("[{}]", kind.label()).red()
    } else {
        format!("[{}]", kind.label()).yellow()
    }
}

/// Count of warn verdicts in a result.
pub fn warning_count(result: &CommitResult) -> usize {
    result
        .duplicates
        .values()
        .filter(|v| **v == DuplicateVerdict::Warn)
        .count()
}

/// Row count after an operation, for the summary line.
pub fn row_summary(sheet: &Sheet) -> String {
    format!("{} rows in '{}'", sheet.row_count(), sheet.name)
}
