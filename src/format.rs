//! Output formatting for the board listing.

use crate::store::Collection;
use crate::types::{Board, CollectionStats, Task, TaskId, TaskStatus};
use serde::Serialize;

/// Output format for the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// What the presenter shows for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub id: TaskId,
    pub glyph: &'static str,
    pub status: TaskStatus,
    pub description: String,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            glyph: task.status.glyph(),
            status: task.status,
            description: task.description.clone(),
        }
    }
}

/// What the presenter shows for one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub tag: String,
    pub completed: usize,
    pub total: usize,
    pub tasks: Vec<TaskView>,
}

impl From<&Board> for BoardView {
    fn from(board: &Board) -> Self {
        Self {
            tag: board.tag.clone(),
            completed: board.completed_count(),
            total: board.total_count(),
            tasks: board.tasks.iter().map(TaskView::from).collect(),
        }
    }
}

impl BoardView {
    /// `[completed/total]`, or `[empty]` for a board with no items at all.
    ///
    /// Notes are listed but not counted, so a notes-only board reads `[0/0]`.
    pub fn summary(&self) -> String {
        if self.tasks.is_empty() {
            "[empty]".to_string()
        } else {
            format!("[{}/{}]", self.completed, self.total)
        }
    }
}

#[derive(Serialize)]
struct ListingJson {
    boards: Vec<BoardView>,
    stats: CollectionStats,
}

/// Render views for every board, in board order.
pub fn board_views(collection: &Collection) -> Vec<BoardView> {
    collection.boards().map(BoardView::from).collect()
}

/// Render the listing in the requested format.
pub fn render(
    collection: &Collection,
    format: OutputFormat,
    show_footer: bool,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(format_collection_text(collection, show_footer)),
        OutputFormat::Json => format_collection_json(collection),
    }
}

/// Format the collection as human-readable text.
pub fn format_collection_text(collection: &Collection, show_footer: bool) -> String {
    let mut out = String::new();

    if collection.is_empty() {
        out.push_str("\n  No boards yet. Add a task with --task \"#board description\".\n");
        return out;
    }

    for view in board_views(collection) {
        out.push('\n');
        out.push_str(&format!("  {} {}\n", view.tag, view.summary()));
        for task in &view.tasks {
            out.push_str(&format_task_line(task));
        }
    }

    if show_footer {
        out.push('\n');
        out.push_str(&format_footer(&collection.stats()));
    }

    out
}

fn format_task_line(task: &TaskView) -> String {
    format!("    {}. {} {}\n", task.id, task.glyph, task.description)
}

/// Completion summary shown under the boards.
pub fn format_footer(stats: &CollectionStats) -> String {
    format!(
        "  {}% of all tasks complete.\n  {} done · {} in-progress · {} pending · {} notes\n",
        stats.percent_complete(),
        stats.completed,
        stats.in_progress,
        stats.pending,
        stats.notes,
    )
}

/// Format the collection as pretty JSON views.
pub fn format_collection_json(collection: &Collection) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ListingJson {
        boards: board_views(collection),
        stats: collection.stats(),
    })
}
