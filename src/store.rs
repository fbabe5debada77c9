//! In-memory task book: boards keyed by tag plus the id allocator.

use crate::error::{TaskbookError, TaskbookResult};
use crate::parser::ParsedCommand;
use crate::storage::StorageError;
use crate::types::{Board, CollectionStats, Task, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Issues monotonically increasing task ids.
///
/// Serializes as the bare counter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdAllocator(TaskId);

impl IdAllocator {
    pub fn new() -> Self {
        Self(1)
    }

    /// Restore from a persisted counter.
    pub fn starting_at(next: TaskId) -> Self {
        Self(next)
    }

    /// Return the current value and advance.
    ///
    /// Returns `None` once the counter has reached `TaskId::MAX`; that value
    /// is never issued.
    pub fn next(&mut self) -> Option<TaskId> {
        let id = self.0;
        self.0 = id.checked_add(1)?;
        Some(id)
    }

    /// The id the next call to [`next`](Self::next) will return.
    pub fn peek(&self) -> TaskId {
        self.0
    }

    /// How many ids can still be issued.
    pub fn remaining(&self) -> u64 {
        TaskId::MAX - self.0
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// The whole task book: id counter and every board.
///
/// Boards iterate in tag order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    next_id: IdAllocator,
    boards: BTreeMap<String, Board>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> TaskId {
        self.next_id.peek()
    }

    /// Return the board for `tag`, registering an empty one if needed.
    pub fn ensure_board(&mut self, tag: &str) -> &mut Board {
        self.boards.entry(tag.to_string()).or_insert_with(|| {
            debug!(tag = %tag, "Created board");
            Board::new(tag)
        })
    }

    /// Add one task per tag, each with its own id.
    ///
    /// Ids are allocated in tag order. Fails without touching the collection
    /// when the description is blank, no tag is given, or there are not
    /// enough ids left for every tag.
    pub fn add_task(
        &mut self,
        tags: &BTreeSet<String>,
        description: &str,
        status: TaskStatus,
    ) -> TaskbookResult<Vec<Task>> {
        let description = description.trim();
        if description.is_empty() {
            return Err(TaskbookError::empty_description());
        }
        if tags.is_empty() {
            return Err(TaskbookError::missing_board());
        }
        if self.next_id.remaining() < tags.len() as u64 {
            return Err(TaskbookError::ids_exhausted(tags.len(), self.next_id.remaining()));
        }

        let mut added = Vec::with_capacity(tags.len());
        for tag in tags {
            let id = self
                .next_id
                .next()
                .ok_or_else(|| TaskbookError::ids_exhausted(tags.len(), 0))?;
            let task = Task {
                id,
                description: description.to_string(),
                status,
            };
            self.ensure_board(tag).tasks.push(task.clone());
            debug!(id = task.id, tag = %tag, status = %status, "Added task");
            added.push(task);
        }

        Ok(added)
    }

    /// Apply a parsed command.
    pub fn apply(&mut self, command: &ParsedCommand) -> TaskbookResult<Vec<Task>> {
        self.add_task(&command.tags, &command.description, command.status)
    }

    pub fn board(&self, tag: &str) -> Option<&Board> {
        self.boards.get(tag)
    }

    /// Boards in tag order.
    pub fn boards(&self) -> impl Iterator<Item = &Board> {
        self.boards.values()
    }

    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    /// Number of items across all boards, notes included.
    pub fn task_count(&self) -> usize {
        self.boards.values().map(|b| b.tasks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    pub fn stats(&self) -> CollectionStats {
        let mut stats = CollectionStats {
            boards: self.boards.len(),
            ..Default::default()
        };
        for task in self.boards.values().flat_map(|b| &b.tasks) {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Note => stats.notes += 1,
            }
        }
        stats
    }

    /// Highest id present on any board.
    pub fn max_task_id(&self) -> Option<TaskId> {
        self.boards
            .values()
            .flat_map(|b| b.tasks.iter().map(|t| t.id))
            .max()
    }

    /// Bring a freshly deserialized collection back in line with its invariants.
    ///
    /// The counter is raised past the highest stored id, and map keys are
    /// treated as authoritative for each board's tag. Fails when the stored
    /// ids leave no room for another task.
    pub(crate) fn repair(&mut self) -> Result<(), StorageError> {
        if let Some(max_id) = self.max_task_id()
            && self.next_id.peek() <= max_id
        {
            let next = max_id.checked_add(1).ok_or(StorageError::IdsExhausted(max_id))?;
            warn!(
                stored = self.next_id.peek(),
                max_id,
                "Stored nextId does not exceed every task id; raising it"
            );
            self.next_id = IdAllocator::starting_at(next);
        }
        if self.next_id.remaining() == 0 {
            return Err(StorageError::IdsExhausted(self.next_id.peek()));
        }

        for (key, board) in self.boards.iter_mut() {
            if board.tag != *key {
                warn!(
                    key = %key,
                    tag = %board.tag,
                    "Board tag differs from its key; using the key"
                );
                board.tag = key.clone();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_allocator_starts_at_one() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next(), Some(1));
        assert_eq!(ids.next(), Some(2));
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn test_allocator_stops_at_max() {
        let mut ids = IdAllocator::starting_at(TaskId::MAX - 1);
        assert_eq!(ids.remaining(), 1);
        assert_eq!(ids.next(), Some(TaskId::MAX - 1));
        assert_eq!(ids.next(), None);
        assert_eq!(ids.next(), None);
        assert_eq!(ids.peek(), TaskId::MAX);
    }

    #[test]
    fn test_add_task_reports_exhausted_ids() {
        let mut collection: Collection =
            serde_json::from_str(&format!(r#"{{"nextId": {}, "boards": {{}}}}"#, TaskId::MAX - 1))
                .unwrap();
        let added = collection
            .add_task(&tag_set(&["#a"]), "last one", TaskStatus::Pending)
            .unwrap();
        assert_eq!(added[0].id, TaskId::MAX - 1);

        let err = collection
            .add_task(&tag_set(&["#a"]), "one too many", TaskStatus::Pending)
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::IdsExhausted);
        assert!(!err.is_fatal());
        assert_eq!(collection.task_count(), 1);
    }

    #[test]
    fn test_multi_tag_add_is_all_or_nothing_near_max() {
        let mut collection: Collection =
            serde_json::from_str(&format!(r#"{{"nextId": {}, "boards": {{}}}}"#, TaskId::MAX - 1))
                .unwrap();
        let err = collection
            .add_task(&tag_set(&["#a", "#b"]), "shared", TaskStatus::Pending)
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::IdsExhausted);
        assert!(collection.is_empty());
        assert_eq!(collection.next_id(), TaskId::MAX - 1);
    }

    #[test]
    fn test_ensure_board_is_idempotent() {
        let mut collection = Collection::new();
        collection.ensure_board("#coding");
        collection.ensure_board("#coding");
        assert_eq!(collection.board_count(), 1);
        assert_eq!(collection.board("#coding").unwrap().tag, "#coding");
    }

    #[test]
    fn test_add_task_fans_out_with_distinct_ids() {
        let mut collection = Collection::new();
        let added = collection
            .add_task(&tag_set(&["#work", "#coding"]), "ship it", TaskStatus::Pending)
            .unwrap();

        assert_eq!(added.len(), 2);
        // Tag order: #coding before #work
        assert_eq!(added[0].id, 1);
        assert_eq!(added[1].id, 2);
        assert_eq!(collection.board("#coding").unwrap().tasks[0].id, 1);
        assert_eq!(collection.board("#work").unwrap().tasks[0].id, 2);
        assert_eq!(collection.next_id(), 3);
    }

    #[test]
    fn test_add_task_trims_description() {
        let mut collection = Collection::new();
        let added = collection
            .add_task(&tag_set(&["#coding"]), "  fix bug  ", TaskStatus::InProgress)
            .unwrap();
        assert_eq!(added[0].description, "fix bug");
    }

    #[test]
    fn test_add_task_rejects_blank_description() {
        let mut collection = Collection::new();
        let err = collection
            .add_task(&tag_set(&["#coding"]), "   ", TaskStatus::Pending)
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::EmptyDescription);
        assert!(collection.is_empty());
        assert_eq!(collection.next_id(), 1);
    }

    #[test]
    fn test_add_task_rejects_missing_tags() {
        let mut collection = Collection::new();
        let err = collection
            .add_task(&BTreeSet::new(), "fix bug", TaskStatus::Pending)
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::MissingBoard);
        assert_eq!(collection.next_id(), 1);
    }

    #[test]
    fn test_stats() {
        let mut collection = Collection::new();
        let coding = tag_set(&["#coding"]);
        collection.add_task(&coding, "one", TaskStatus::Pending).unwrap();
        collection.add_task(&coding, "two", TaskStatus::Completed).unwrap();
        collection.add_task(&coding, "three", TaskStatus::Note).unwrap();

        let stats = collection.stats();
        assert_eq!(stats.boards, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.notes, 1);
        assert_eq!(collection.task_count(), 3);
        assert_eq!(collection.max_task_id(), Some(3));
    }

    fn single_task_document(next_id: TaskId, task_id: TaskId) -> String {
        format!(
            r##"{{"nextId": {}, "boards": {{"#a": {{"tag": "#b",
                "tasks": [{{"id": {}, "description": "x y", "status": 0}}]}}}}}}"##,
            next_id, task_id
        )
    }

    #[test]
    fn test_repair_raises_counter() {
        let mut collection: Collection = serde_json::from_str(&single_task_document(2, 5)).unwrap();
        collection.repair().unwrap();
        assert_eq!(collection.next_id(), 6);
        assert_eq!(collection.board("#a").unwrap().tag, "#a");
    }

    #[test]
    fn test_repair_rejects_max_task_id() {
        let mut collection: Collection =
            serde_json::from_str(&single_task_document(1, TaskId::MAX)).unwrap();
        assert!(matches!(
            collection.repair(),
            Err(StorageError::IdsExhausted(TaskId::MAX))
        ));
    }

    #[test]
    fn test_repair_rejects_exhausted_counter() {
        let mut collection: Collection =
            serde_json::from_str(&format!(r#"{{"nextId": {}, "boards": {{}}}}"#, TaskId::MAX))
                .unwrap();
        assert!(collection.repair().is_err());
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert!(serde_json::from_str::<Collection>(r#"{"tasks": []}"#).is_err());
        assert!(serde_json::from_str::<Collection>(r#"{"nextId": 1}"#).is_err());
        assert!(serde_json::from_str::<Collection>(r#"{"boards": {}}"#).is_err());
    }
}
