//! Row commands - duplicate, insert and delete.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::{print_commit, print_row, row_summary, Workspace};
use sheetwright::SheetStore;

/// Copy a row below itself with incremented identifiers.
pub fn duplicate(
    file: PathBuf,
    config: Option<&Path>,
    row: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut workspace = Workspace::open(file, config)?;
    let result = workspace.controller.duplicate_row(&mut workspace.sheet, row)?;
    print_commit(&result, &workspace.controller, "Duplicated into");

    if !result.success {
        return Err(format!("row {} could not be duplicated", row).into());
    }

    workspace.save()?;
    println!("{}", row_summary(&workspace.sheet).dimmed());
    Ok(())
}

/// Insert an empty row below a row.
pub fn insert(
    file: PathBuf,
    config: Option<&Path>,
    row: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut workspace = Workspace::open(file, config)?;
    let index = workspace.controller.insert_blank_row(&mut workspace.sheet, row)?;

    workspace.save()?;
    println!(
        "{} Inserted blank row {}",
        "✓".green().bold(),
        index.to_string().white().bold()
    );
    println!("{}", row_summary(&workspace.sheet).dimmed());
    Ok(())
}

/// Remove a row.
pub fn delete(
    file: PathBuf,
    config: Option<&Path>,
    row: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut workspace = Workspace::open(file, config)?;
    let outcome = workspace.controller.delete_row(&mut workspace.sheet, row)?;

    workspace.save()?;
    println!(
        "{} Deleted row {}",
        "✓".green().bold(),
        outcome.removed_index.to_string().white().bold()
    );

    match outcome.focus_after_delete() {
        Some(focus) => {
            println!("{} row {}", "Now at".dimmed(), focus);
            if let Some(next) = workspace.sheet.row(focus) {
                print_row(&workspace.controller, next);
            }
        }
        None => println!("{}", "Sheet is now empty".dimmed()),
    }
    println!("{}", row_summary(&workspace.sheet).dimmed());
    Ok(())
}
