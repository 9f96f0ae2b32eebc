//! Integration tests for CSV-backed sheets and configuration files.

use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

use sheetwright::{
    CsvOptions, DuplicatePolicy, Row, RowLifecycleController, RuleOverride, Sheet, SheetStore,
    SheetwrightConfig, SheetwrightError,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

#[test]
fn test_read_tsv_auto_detect() {
    let content = "ID (Unique)\tName (R)\tAmount\n\
                   ID001\tAlice\t10.00\n\
                   ID002\tBob\t5.50\n";
    let file = create_test_file(content);

    let sheet = Sheet::read_csv(file.path(), &CsvOptions::default()).expect("Read failed");
    assert_eq!(sheet.column_count(), 3);
    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.get(1, 1), Some("Bob"));
}

#[test]
fn test_commit_and_save_round_trip() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("orders.csv");

    let file = create_test_file("ID (Unique),Name (R),Amount,Notes\nID001,Alice,10.00,\n");
    let mut sheet = Sheet::read_csv(file.path(), &CsvOptions::default()).unwrap();
    let mut ctl = RowLifecycleController::for_store(SheetwrightConfig::default(), &sheet);

    let result = ctl
        .commit(&mut sheet, Row::new(["ID002", "Bob, Jr.", "7", "rush order"]))
        .unwrap();
    assert!(result.success);
    sheet.write_csv(&path, &CsvOptions::default()).unwrap();

    let reloaded = Sheet::read_csv(&path, &CsvOptions::default()).unwrap();
    assert_eq!(reloaded.name, "orders");
    assert_eq!(reloaded.headers(), sheet.headers());
    assert_eq!(reloaded.rows(), sheet.rows());
    assert_eq!(reloaded.get(1, 1), Some("Bob, Jr."));
    assert_eq!(reloaded.get(1, 2), Some("7.00"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = Sheet::read_csv(dir.path().join("absent.csv"), &CsvOptions::default());
    assert!(matches!(result, Err(SheetwrightError::Io { .. })));
}

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sheetwright.json");

    let mut config = SheetwrightConfig::default();
    config.duplicates.case_sensitive = true;
    config.lifecycle.max_increment_attempts = 50;
    config
        .rules
        .overrides
        .insert("Email".to_string(), RuleOverride::policy(DuplicatePolicy::Strict));

    config.save(&path).unwrap();
    let loaded = SheetwrightConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_config_file() {
    let file = create_test_file(r#"{ "validation": { "date_formats": ["%d.%m.%Y"] } }"#);
    let config = SheetwrightConfig::load(file.path()).unwrap();

    let mut sheet = Sheet::new("Events", ["Event Date", "Title"]);
    let mut ctl = RowLifecycleController::for_store(config, &sheet);
    let result = ctl
        .commit(&mut sheet, Row::new(["24.12.2024", "Party"]))
        .unwrap();
    assert!(result.success);
    assert_eq!(sheet.get(0, 0), Some("2024-12-24"));
}

#[test]
fn test_invalid_config_rejected() {
    let file = create_test_file(r#"{ "lifecycle": { "max_increment_attempts": 0 } }"#);
    assert!(matches!(
        SheetwrightConfig::load(file.path()),
        Err(SheetwrightError::Config(_))
    ));

    let file = create_test_file("{ not json");
    assert!(matches!(
        SheetwrightConfig::load(file.path()),
        Err(SheetwrightError::Json(_))
    ));
}
