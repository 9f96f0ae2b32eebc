//! Validate command - check every stored row against the header rules.

use std::path::{Path, PathBuf};

use colored::Colorize;
use sheetwright::{
    DuplicatePolicyEngine, EditSession, ErrorKind, Header, RowContext, SheetStore, ValidationEngine,
};

use super::{severity_tag, Workspace};

pub fn run(
    file: PathBuf,
    config: Option<&Path>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let workspace = Workspace::open(file, config)?;
    let controller = &workspace.controller;
    let rules = controller.rules();
    let engine = ValidationEngine::with_config(controller.config().validation.clone());
    let duplicates = DuplicatePolicyEngine::with_config(controller.config().duplicates.clone());

    // Each row is checked as if it were under edit, so it is compared
    // against every other row but not itself.
    let mut report = Vec::new();
    for (index, row) in workspace.sheet.rows().iter().enumerate() {
        let validation = engine.validate(row, rules, RowContext::Existing(index));
        let session = EditSession::capture(index, row, rules);
        let verdicts = duplicates
            .index(workspace.sheet.rows(), rules, Some(&session))
            .check(&validation.normalized, None);

        let mut issues: Vec<(Header, ErrorKind)> = validation
            .errors()
            .map(|(h, kind)| (h.clone(), kind))
            .collect();
        for (header, verdict) in &verdicts {
            if let (Some(kind), None) = (verdict.error_kind(), validation.error(header)) {
                issues.push((header.clone(), kind));
            }
        }
        if !issues.is_empty() {
            report.push((index, issues));
        }
    }

    if json_output {
        let entries: Vec<serde_json::Value> = report
            .iter()
            .map(|(index, issues)| {
                serde_json::json!({
                    "row": index,
                    "issues": issues
                        .iter()
                        .map(|(h, kind)| serde_json::json!({ "header": h.name, "kind": kind }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let total = workspace.sheet.row_count();
    if report.is_empty() {
        println!("{} All {} rows pass", "✓".green().bold(), total);
        return Ok(());
    }

    let blocking = report
        .iter()
        .filter(|(_, issues)| issues.iter().any(|(_, k)| k.is_blocking()))
        .count();
    println!(
        "{} {} of {} rows have issues ({} blocking)",
        "!".yellow().bold(),
        report.len(),
        total,
        blocking.to_string().red()
    );

    for (index, issues) in &report {
        println!();
        println!("{}", format!("Row {}", index).white().bold());
        for (header, kind) in issues {
            let field_type = rules.get(header).map(|r| r.field_type).unwrap_or_default();
            println!("  {} {}", severity_tag(*kind), kind.message(header, field_type));
        }
    }

    Ok(())
}
