//! Applying command-line mutations to a collection.

use crate::error::{TaskbookError, TaskbookResult};
use crate::parser::{parse_command, parse_note};
use crate::store::Collection;
use crate::types::Task;
use tracing::debug;

/// A requested change, holding the raw command text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Task(String),
    Note(String),
}

impl Mutation {
    pub fn text(&self) -> &str {
        match self {
            Mutation::Task(text) | Mutation::Note(text) => text,
        }
    }

    /// Parse and apply to `collection`.
    pub fn apply(&self, collection: &mut Collection) -> TaskbookResult<Vec<Task>> {
        let command = match self {
            Mutation::Task(text) => parse_command(text)?,
            Mutation::Note(text) => parse_note(text)?,
        };
        collection.apply(&command)
    }
}

/// Result of applying a batch of mutations.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub added: Vec<Task>,
    /// Dropped mutations with the reason.
    pub rejected: Vec<(Mutation, TaskbookError)>,
}

/// Apply every mutation, dropping the ones that fail.
pub fn apply_all(collection: &mut Collection, mutations: Vec<Mutation>) -> ApplyReport {
    let mut report = ApplyReport::default();
    for mutation in mutations {
        match mutation.apply(collection) {
            Ok(added) => report.added.extend(added),
            Err(err) => {
                debug!(text = %mutation.text(), code = ?err.code, "Dropped command");
                report.rejected.push((mutation, err));
            }
        }
    }
    report
}
