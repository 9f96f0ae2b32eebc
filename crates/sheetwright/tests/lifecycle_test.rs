//! End-to-end tests for the row lifecycle.

use sheetwright::{
    DuplicatePolicy, DuplicateVerdict, ErrorKind, FieldType, Mode, Row, RowLifecycleController,
    RuleConfig, RuleOverride, Sheet, SheetStore, SheetwrightConfig,
};

fn orders_sheet() -> Sheet {
    Sheet::new("Orders", ["ID (Unique)", "Name (R)", "Amount", "Notes"])
}

fn controller_for(sheet: &Sheet) -> RowLifecycleController {
    RowLifecycleController::for_store(SheetwrightConfig::default(), sheet)
}

// =============================================================================
// Add / Edit
// =============================================================================

#[test]
fn test_orders_scenario() {
    let mut sheet = orders_sheet();
    let mut ctl = controller_for(&sheet);

    let rules = ctl.rules();
    let (_, id) = rules.get_by_name("ID (Unique)").unwrap();
    assert_eq!(id.duplicate_policy, DuplicatePolicy::Strict);
    let (_, amount) = rules.get_by_name("Amount").unwrap();
    assert_eq!(amount.field_type, FieldType::Decimal { scale: 2 });
    let (_, notes) = rules.get_by_name("Notes").unwrap();
    assert!(!notes.required);

    let first = ctl
        .commit(&mut sheet, Row::new(["ID001", "Alice", "10", ""]))
        .expect("commit failed");
    assert!(first.success);
    assert_eq!(sheet.get(0, 2), Some("10.00"));

    let second = ctl
        .commit(&mut sheet, Row::new(["ID001", "Bob", "3", ""]))
        .expect("commit failed");
    assert!(!second.success);
    assert_eq!(second.duplicates[0], DuplicateVerdict::Reject);
    assert_eq!(second.issue_by_name("ID (Unique)"), Some(ErrorKind::DuplicateConflict));
    assert_eq!(sheet.row_count(), 1);
}

#[test]
fn test_all_problems_reported_at_once() {
    let mut sheet = Sheet::new("People", ["ID", "Name (R)", "Email", "DOB", "Qty"]);
    let mut ctl = controller_for(&sheet);

    let result = ctl
        .commit(&mut sheet, Row::new(["P1", "", "not-an-email", "31/02/2024", "many"]))
        .unwrap();

    assert!(!result.success);
    let issues = result.issues();
    assert_eq!(issues.len(), 4);
    assert_eq!(result.issue_by_name("Name (R)"), Some(ErrorKind::MissingRequired));
    assert_eq!(result.issue_by_name("Email"), Some(ErrorKind::InvalidFormat));
    assert_eq!(result.issue_by_name("DOB"), Some(ErrorKind::InvalidFormat));
    assert_eq!(result.issue_by_name("Qty"), Some(ErrorKind::InvalidFormat));

    let messages = result.messages(ctl.rules());
    assert!(messages.contains(&"'Name (R)' is required.".to_string()));
    assert!(messages.contains(&"'Qty' expects a whole number.".to_string()));
}

#[test]
fn test_values_are_normalized_on_store() {
    let mut sheet = Sheet::new("People", ["ID", "Name", "Joined Date", "Email", "Total"]);
    let mut ctl = controller_for(&sheet);

    let result = ctl
        .commit(
            &mut sheet,
            Row::new(["  P7 ", "Ada   Lovelace", "10/12/1815", "ada@example.org", "1,234.5"]),
        )
        .unwrap();

    assert!(result.success);
    let row = sheet.row(0).unwrap();
    assert_eq!(row.values(), &["P7", "Ada Lovelace", "1815-12-10", "ada@example.org", "1234.50"]);
}

#[test]
fn test_edit_self_exclusion() {
    let mut sheet = orders_sheet();
    let mut ctl = controller_for(&sheet);
    ctl.commit(&mut sheet, Row::new(["ID001", "Alice", "10", ""])).unwrap();

    ctl.begin_edit(&sheet, 0).unwrap();
    let session = ctl.edit_session().unwrap();
    assert_eq!(session.original_row().get(0), "ID001");

    let result = ctl
        .commit(&mut sheet, Row::new(["ID001", "Alice", "11", "paid"]))
        .unwrap();
    assert!(result.success);
    assert_eq!(result.duplicates[0], DuplicateVerdict::Ok);
    assert_eq!(sheet.row(0).unwrap().values(), &["ID001", "Alice", "11.00", "paid"]);
    assert_eq!(ctl.mode(), Mode::Add);
}

#[test]
fn test_edit_keeps_legacy_duplicate_committable() {
    // Two rows already share an identifier; editing one must not be blocked
    // as long as the identifier is left unchanged.
    let mut sheet = Sheet::with_rows(
        "Legacy",
        sheetwright::Header::from_names(["Code [strict]", "Label"]),
        vec![Row::new(["X1", "a"]), Row::new(["X1", "b"])],
    )
    .unwrap();
    let mut ctl = controller_for(&sheet);

    ctl.begin_edit(&sheet, 1).unwrap();
    let result = ctl.commit(&mut sheet, Row::new(["X1", "bee"])).unwrap();
    assert!(result.success);
    assert_eq!(sheet.get(1, 1), Some("bee"));
}

#[test]
fn test_failed_edit_stays_in_edit_mode() {
    let mut sheet = orders_sheet();
    let mut ctl = controller_for(&sheet);
    ctl.commit(&mut sheet, Row::new(["ID001", "Alice", "10", ""])).unwrap();
    let before = sheet.clone();

    ctl.begin_edit(&sheet, 0).unwrap();
    let result = ctl.commit(&mut sheet, Row::new(["ID001", "", "10", ""])).unwrap();

    assert!(!result.success);
    assert_eq!(ctl.mode(), Mode::Edit);
    assert_eq!(sheet, before);
}

#[test]
fn test_warn_policy_never_blocks() {
    let mut sheet = Sheet::new("Contacts", ["Name (R)", "Email (duplicate-warn)", "Notes"]);
    let mut ctl = controller_for(&sheet);

    ctl.commit(&mut sheet, Row::new(["Alice", "alice@x.com", ""])).unwrap();
    let result = ctl
        .commit(&mut sheet, Row::new(["Alicia", "Alice@X.com", ""]))
        .unwrap();

    assert!(result.success);
    assert!(result.has_warnings());
    assert_eq!(result.issue_by_name("Email (duplicate-warn)"), Some(ErrorKind::DuplicateWarning));
    assert_eq!(sheet.row_count(), 2);
}

#[test]
fn test_live_checks_do_not_mutate() {
    let mut sheet = orders_sheet();
    let mut ctl = controller_for(&sheet);
    ctl.commit(&mut sheet, Row::new(["ID001", "Alice", "10", ""])).unwrap();

    let candidate = Row::new(["ID001", "", "x", ""]);
    let validation = ctl.validate(&candidate);
    let verdicts = ctl.check_duplicates(&candidate, &sheet);

    assert!(!validation.is_valid);
    assert_eq!(validation.error_count(), 2);
    assert_eq!(verdicts[0], DuplicateVerdict::Reject);
    assert_eq!(sheet.row_count(), 1);
}

// =============================================================================
// Row operations
// =============================================================================

#[test]
fn test_duplicate_increments_identifiers() {
    let mut sheet = Sheet::new("Refs", ["Ref (Unique)", "Item"]);
    let mut ctl = controller_for(&sheet);
    ctl.commit(&mut sheet, Row::new(["Ref10", "Bolt"])).unwrap();

    let result = ctl.duplicate_row(&mut sheet, 0).unwrap();
    assert!(result.success);
    assert_eq!(sheet.get(1, 0), Some("Ref11"));
    assert_eq!(sheet.get(1, 1), Some("Bolt"));

    let mut sheet = orders_sheet();
    let mut ctl = controller_for(&sheet);
    ctl.commit(&mut sheet, Row::new(["ID001", "Alice", "10", ""])).unwrap();

    let result = ctl.duplicate_row(&mut sheet, 0).unwrap();
    assert!(result.success);
    assert_eq!(result.applied_row_index, Some(1));
    assert_eq!(sheet.get(1, 0), Some("ID002"));
}

#[test]
fn test_duplicate_without_digits_is_rejected_under_strict() {
    let mut sheet = Sheet::new("Codes", ["Code [strict]", "Label"]);
    let mut ctl = controller_for(&sheet);
    ctl.commit(&mut sheet, Row::new(["ALPHA", "first"])).unwrap();

    let result = ctl.duplicate_row(&mut sheet, 0).unwrap();
    assert!(!result.success);
    assert_eq!(result.issue_by_name("Code [strict]"), Some(ErrorKind::DuplicateConflict));
    assert_eq!(sheet.row_count(), 1);
}

#[test]
fn test_duplicate_shifts_edit_session() {
    let mut sheet = orders_sheet();
    let mut ctl = controller_for(&sheet);
    ctl.commit(&mut sheet, Row::new(["ID001", "Alice", "1", ""])).unwrap();
    ctl.commit(&mut sheet, Row::new(["ID005", "Eve", "1", ""])).unwrap();

    ctl.begin_edit(&sheet, 1).unwrap();
    ctl.duplicate_row(&mut sheet, 0).unwrap();
    assert_eq!(ctl.edit_session().unwrap().target_row_index, 2);
    assert_eq!(sheet.get(2, 0), Some("ID005"));
}

#[test]
fn test_insert_then_fill_blank_row_via_edit() {
    let mut sheet = orders_sheet();
    let mut ctl = controller_for(&sheet);
    ctl.commit(&mut sheet, Row::new(["ID001", "Alice", "1", ""])).unwrap();
    ctl.commit(&mut sheet, Row::new(["ID003", "Carol", "1", ""])).unwrap();

    let new_index = ctl.insert_blank_row(&mut sheet, 0).unwrap();
    assert_eq!(new_index, 1);
    assert!(sheet.row(1).unwrap().is_blank());

    ctl.begin_edit(&sheet, new_index).unwrap();
    let result = ctl
        .commit(&mut sheet, Row::new(["ID002", "Bob", "2", ""]))
        .unwrap();
    assert!(result.success);
    assert_eq!(sheet.column_values(0).collect::<Vec<_>>(), vec!["ID001", "ID002", "ID003"]);
}

#[test]
fn test_delete_focus_contract() {
    let mut sheet = orders_sheet();
    let mut ctl = controller_for(&sheet);
    for id in ["ID001", "ID002", "ID003"] {
        ctl.commit(&mut sheet, Row::new([id, "x", "1", ""])).unwrap();
    }

    let middle = ctl.delete_row(&mut sheet, 1).unwrap();
    assert_eq!(middle.removed_index, 1);
    assert_eq!(middle.suggested_focus_index, Some(2));
    assert_eq!(middle.focus_after_delete(), Some(1));

    let last = ctl.delete_row(&mut sheet, 1).unwrap();
    assert_eq!(last.suggested_focus_index, Some(0));

    let only = ctl.delete_row(&mut sheet, 0).unwrap();
    assert_eq!(only.suggested_focus_index, None);
    assert_eq!(sheet.row_count(), 0);
}

// =============================================================================
// Rule configuration
// =============================================================================

#[test]
fn test_configured_tokens_and_overrides() {
    let rules = RuleConfig {
        decimal_tokens: vec!["fee".to_string()],
        ..RuleConfig::default()
    }
    .with_override("Reference", RuleOverride::policy(DuplicatePolicy::Strict));

    let config = SheetwrightConfig {
        rules,
        ..SheetwrightConfig::default()
    };

    let mut sheet = Sheet::new("Fees", ["Reference", "Fee", "Amount"]);
    let mut ctl = RowLifecycleController::for_store(config, &sheet);

    let (_, fee) = ctl.rules().get_by_name("Fee").unwrap();
    assert!(fee.field_type.is_numeric());
    let (_, amount) = ctl.rules().get_by_name("Amount").unwrap();
    assert_eq!(amount.field_type, FieldType::Text);

    ctl.commit(&mut sheet, Row::new(["R-1", "5", "n/a"])).unwrap();
    let clash = ctl.commit(&mut sheet, Row::new(["r-1", "6", ""])).unwrap();
    assert!(!clash.success);
    assert_eq!(clash.issue_by_name("Reference"), Some(ErrorKind::DuplicateConflict));
}
