//! CLI definitions for taskbook.
//!
//! The main entry point is the `Cli` struct. Words after `--task` or
//! `--note` are joined back into a single command line.

use crate::commands::Mutation;
use crate::format::OutputFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Listing format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Boards and tasks as text (default)
    #[default]
    Text,
    /// Boards, tasks and totals as JSON
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Tasks and notes on boards, from the command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Add a task: one or more #board tags, optional #status, then the description
    #[arg(short, long, num_args = 1.., value_name = "TEXT")]
    pub task: Option<Vec<String>>,

    /// Add a note: one or more #board tags, then the text
    #[arg(short, long, num_args = 1.., value_name = "TEXT")]
    pub note: Option<Vec<String>>,

    /// Storage directory (overrides config and TASKBOOK_DIR)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Listing format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    pub log: String,
}

impl Cli {
    /// Mutations requested on the command line, tasks before notes.
    pub fn mutations(&self) -> Vec<Mutation> {
        let mut mutations = Vec::new();
        if let Some(ref words) = self.task {
            mutations.push(Mutation::Task(words.join(" ")));
        }
        if let Some(ref words) = self.note {
            mutations.push(Mutation::Note(words.join(" ")));
        }
        mutations
    }
}
