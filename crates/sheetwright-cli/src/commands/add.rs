//! Add command - commit a new row.

use std::path::{Path, PathBuf};

use colored::Colorize;
use sheetwright::{Row, SheetStore};

use super::{parse_assignments, print_commit, row_summary, warning_count, Workspace};

pub fn run(
    file: PathBuf,
    config: Option<&Path>,
    values: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut workspace = Workspace::open(file, config)?;
    let pairs = parse_assignments(workspace.sheet.headers(), &values)?;
    let candidate = Row::from_pairs(workspace.sheet.headers(), pairs);

    workspace.controller.begin_add();
    let result = workspace.controller.commit(&mut workspace.sheet, candidate)?;
    print_commit(&result, &workspace.controller, "Added");

    if !result.success {
        return Err("row was not added".into());
    }

    workspace.save()?;
    let warnings = warning_count(&result);
    if warnings > 0 {
        println!(
            "{} saved with {} possible duplicate(s)",
            "!".yellow().bold(),
            warnings
        );
    }
    println!("{}", row_summary(&workspace.sheet).dimmed());
    Ok(())
}
