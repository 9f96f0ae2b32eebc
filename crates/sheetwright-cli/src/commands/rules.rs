//! Rules command - show the rule inferred from each header.

use std::path::{Path, PathBuf};

use colored::Colorize;
use sheetwright::DuplicatePolicy;

use super::Workspace;

pub fn run(
    file: PathBuf,
    config: Option<&Path>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let workspace = Workspace::open(file, config)?;
    let rules = workspace.controller.rules();

    if json_output {
        let entries: Vec<serde_json::Value> = rules
            .iter()
            .map(|(header, rule)| {
                serde_json::json!({
                    "header": header.name,
                    "position": header.position,
                    "rule": rule,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Rules for".cyan().bold(),
        workspace.path.display().to_string().white()
    );
    println!();

    let width = rules.headers().map(|h| h.name.len()).max().unwrap_or(0);
    for (header, rule) in rules.iter() {
        let required = if rule.required {
            format!("{:9}", "required").yellow()
        } else {
            format!("{:9}", "optional").dimmed()
        };
        let policy = match rule.duplicate_policy {
            DuplicatePolicy::Strict => "strict".red(),
            DuplicatePolicy::Warn => "warn".yellow(),
            DuplicatePolicy::None => "-".dimmed(),
        };
        let unique = if rule.unique { " unique" } else { "" };

        println!(
            "  {:width$}  {:12} {} dup:{}{}",
            header.name,
            rule.field_type.to_string(),
            required,
            policy,
            unique.blue(),
            width = width
        );
    }

    Ok(())
}
