//! Core types for the task book.

use serde::{Deserialize, Serialize};

/// Marker that starts every board tag and status keyword.
pub const TAG_MARKER: char = '#';

/// Unique task identifier, global across all boards.
pub type TaskId = u64;

/// Task status.
///
/// Declaration order is the rank used when several status keywords appear in
/// one command, and the ordinal written to the stored document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum TaskStatus {
    #[default]
    Pending = 0,
    InProgress = 1,
    Completed = 2,
    /// A non-actionable annotation rather than a unit of work.
    Note = 3,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "inProgress",
            TaskStatus::Completed => "completed",
            TaskStatus::Note => "note",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "inProgress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            "note" => Some(TaskStatus::Note),
            _ => None,
        }
    }

    /// Match a marker-prefixed status keyword such as `#completed`.
    pub fn from_keyword(token: &str) -> Option<Self> {
        token.strip_prefix(TAG_MARKER).and_then(Self::from_str)
    }

    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "☐",
            TaskStatus::InProgress => "…",
            TaskStatus::Completed => "✔",
            TaskStatus::Note => "●",
        }
    }

    /// Notes are excluded from the `[completed/total]` counts.
    pub fn is_task(&self) -> bool {
        !matches!(self, TaskStatus::Note)
    }
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> u8 {
        status as u8
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TaskStatus::ALL
            .into_iter()
            .find(|s| s.rank() == value)
            .ok_or_else(|| format!("unknown task status ordinal {}", value))
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task or note on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub status: TaskStatus,
}

/// A named bucket of tasks, keyed by its tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub tag: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Board {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            tasks: Vec::new(),
        }
    }

    pub fn completed_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.status.is_task()).count()
    }

    /// True only when the board holds nothing at all. Notes count here even
    /// though they are left out of [`total_count`](Self::total_count).
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Aggregate counts across every board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub boards: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub notes: usize,
}

impl CollectionStats {
    pub fn total_tasks(&self) -> usize {
        self.pending + self.in_progress + self.completed
    }

    /// Whole-number completion percentage; 0 when there are no tasks.
    pub fn percent_complete(&self) -> usize {
        match self.total_tasks() {
            0 => 0,
            total => self.completed * 100 / total,
        }
    }
}
