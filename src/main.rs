//! Taskbook
//!
//! Adds tasks and notes to boards from the command line, persists them to
//! `~/.taskbook/taskbook.json`, and prints the boards.

use anyhow::Result;
use clap::Parser;
use taskbook::cli::Cli;
use taskbook::commands::apply_all;
use taskbook::config::Config;
use taskbook::format::{OutputFormat, render};
use taskbook::logging::{self, LogTarget};
use taskbook::paths::StoragePaths;
use taskbook::storage;
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let mut config = Config::discover(cli.config.as_deref())?;
    if let Some(dir) = &cli.dir {
        config.storage.dir = Some(dir.clone());
    }

    // No usable storage location is the one unrecoverable condition.
    let paths = StoragePaths::resolve(&config)?;
    debug!(
        dir = %paths.dir().display(),
        file = %paths.file().display(),
        "Resolved task book location"
    );

    let mut collection = storage::load(paths.file());

    let report = apply_all(&mut collection, cli.mutations());
    for (mutation, err) in &report.rejected {
        println!("✖ {} ({})", err, mutation.text());
    }
    for task in &report.added {
        info!(id = task.id, status = %task.status, "Created item");
    }

    storage::save(&collection, paths.file())?;

    let format = OutputFormat::from(cli.format);
    let output = render(&collection, format, config.display.show_footer)?;
    print!("{}", output);
    if format == OutputFormat::Json {
        println!();
    }

    Ok(())
}
