//! Command-line text parsing.
//!
//! A command is free text such as `#coding #inProgress fix the build`.
//! Marker-prefixed tokens are either status keywords or board tags; every
//! other token belongs to the description.

use crate::error::{TaskbookError, TaskbookResult};
use crate::types::{TAG_MARKER, TaskStatus};
use std::collections::BTreeSet;

/// A parsed mutation request, ready for [`Collection::apply`](crate::store::Collection::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub tags: BTreeSet<String>,
    pub description: String,
    pub status: TaskStatus,
}

/// Parse a task command.
///
/// When several status keywords are given the highest-ranked one wins.
/// Without any, the status is [`TaskStatus::Pending`].
pub fn parse_command(input: &str) -> TaskbookResult<ParsedCommand> {
    parse_tokens(input.split_whitespace())
}

/// Parse a note command. The status is always [`TaskStatus::Note`].
pub fn parse_note(input: &str) -> TaskbookResult<ParsedCommand> {
    let mut command = parse_command(input)?;
    command.status = TaskStatus::Note;
    Ok(command)
}

/// Parse already-split tokens.
pub fn parse_tokens<'a, I>(tokens: I) -> TaskbookResult<ParsedCommand>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tags = BTreeSet::new();
    let mut status: Option<TaskStatus> = None;
    let mut words = Vec::new();

    for token in tokens {
        if !token.starts_with(TAG_MARKER) {
            words.push(token);
            continue;
        }

        if let Some(keyword) = TaskStatus::from_keyword(token) {
            // Strictly greater keeps the first-seen maximum.
            if status.is_none_or(|current| keyword > current) {
                status = Some(keyword);
            }
        } else if token.len() > TAG_MARKER.len_utf8() {
            tags.insert(token.to_string());
        }
    }

    if tags.is_empty() {
        return Err(TaskbookError::invalid_board_name());
    }

    let description = words.join(" ");
    if description.chars().count() < 2 {
        return Err(TaskbookError::invalid_description());
    }

    Ok(ParsedCommand {
        tags,
        description,
        status: status.unwrap_or_default(),
    })
}
