//! Edit command - change fields of an existing row.

use std::path::{Path, PathBuf};

use colored::Colorize;
use sheetwright::SheetStore;

use super::{apply_assignments, parse_assignments, print_commit, Workspace};

pub fn run(
    file: PathBuf,
    config: Option<&Path>,
    row: usize,
    values: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if values.is_empty() {
        return Err("nothing to change; pass at least one --value HEADER=VALUE".into());
    }

    let mut workspace = Workspace::open(file, config)?;
    let headers = workspace.sheet.headers().to_vec();
    let pairs = parse_assignments(&headers, &values)?;

    let session = workspace.controller.begin_edit(&workspace.sheet, row)?;
    let candidate = apply_assignments(&headers, &session.original_row(), &pairs);

    let result = workspace.controller.commit(&mut workspace.sheet, candidate)?;
    print_commit(&result, &workspace.controller, "Updated");

    if !result.success {
        workspace.controller.cancel();
        return Err(format!("row {} was not changed", row).into());
    }

    workspace.save()?;
    println!("{}", format!("Saved {}", workspace.path.display()).dimmed());
    Ok(())
}
