//! Sheetwright CLI - validating record editor for CSV sheets.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Rules { file, json } => commands::rules::run(file, config, json),

        Commands::Validate { file, json } => commands::validate::run(file, config, json),

        Commands::Add { file, values } => commands::add::run(file, config, values),

        Commands::Edit { file, row, values } => commands::edit::run(file, config, row, values),

        Commands::Duplicate { file, row } => commands::rows::duplicate(file, config, row),

        Commands::Insert { file, row } => commands::rows::insert(file, config, row),

        Commands::Delete { file, row } => commands::rows::delete(file, config, row),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sheetwright=debug" } else { "sheetwright=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
