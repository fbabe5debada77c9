//! Structured error types for command processing and persistence.

use serde::Serialize;
use std::fmt;

/// Broad error category. Decides whether the run may continue.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A command line could not be parsed. The command is dropped.
    Parse,
    /// A mutation reached the store with unusable input. The mutation is dropped.
    Validation,
    /// The stored document was missing or unusable. An empty collection is used.
    PersistenceDegraded,
    /// The storage location cannot be resolved, created or written.
    PersistenceFatal,
}

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Parse errors
    InvalidBoardName,
    InvalidDescription,

    // Validation errors
    EmptyDescription,
    MissingBoard,
    IdsExhausted,

    // Degraded persistence
    StorageUnreadable,
    StorageMalformed,
    UnsupportedVersion,

    // Fatal persistence
    HomeDirUnavailable,
    StorageDirUnavailable,
    StorageWriteFailed,
}

impl ErrorCode {
    /// The category this code belongs to.
    pub fn kind(self) -> ErrorKind {
        match self {
            ErrorCode::InvalidBoardName | ErrorCode::InvalidDescription => ErrorKind::Parse,
            ErrorCode::EmptyDescription
            | ErrorCode::MissingBoard
            | ErrorCode::IdsExhausted => ErrorKind::Validation,
            ErrorCode::StorageUnreadable
            | ErrorCode::StorageMalformed
            | ErrorCode::UnsupportedVersion => ErrorKind::PersistenceDegraded,
            ErrorCode::HomeDirUnavailable
            | ErrorCode::StorageDirUnavailable
            | ErrorCode::StorageWriteFailed => ErrorKind::PersistenceFatal,
        }
    }
}

/// Structured error carried through the taskbook core.
#[derive(Debug, Serialize)]
pub struct TaskbookError {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl TaskbookError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind: code.kind(),
            code,
            message: message.into(),
            field: None,
            details: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Only fatal errors abort the run.
    pub fn is_fatal(&self) -> bool {
        self.kind == ErrorKind::PersistenceFatal
    }

    // Convenience constructors

    pub fn invalid_board_name() -> Self {
        Self::new(ErrorCode::InvalidBoardName, "invalid board name").with_field("tags")
    }

    pub fn invalid_description() -> Self {
        Self::new(ErrorCode::InvalidDescription, "invalid description").with_field("description")
    }

    pub fn empty_description() -> Self {
        Self::new(ErrorCode::EmptyDescription, "description must not be empty")
            .with_field("description")
    }

    pub fn missing_board() -> Self {
        Self::new(ErrorCode::MissingBoard, "at least one board is required").with_field("tags")
    }

    pub fn ids_exhausted(needed: usize, remaining: u64) -> Self {
        Self::new(ErrorCode::IdsExhausted, "no task ids left")
            .with_details(format!("{} needed, {} remaining", needed, remaining))
    }

    pub fn storage_unreadable(path: &std::path::Path, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::StorageUnreadable,
            format!("cannot read {}", path.display()),
        )
        .with_details(err.to_string())
    }

    pub fn storage_malformed(path: &std::path::Path, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::StorageMalformed,
            format!("{} is not a valid taskbook document", path.display()),
        )
        .with_details(err.to_string())
    }

    pub fn unsupported_version(path: &std::path::Path, version: u32) -> Self {
        Self::new(
            ErrorCode::UnsupportedVersion,
            format!(
                "{} uses document version {}, which this build cannot read",
                path.display(),
                version
            ),
        )
        .with_field("version")
    }

    pub fn home_dir_unavailable() -> Self {
        Self::new(
            ErrorCode::HomeDirUnavailable,
            "cannot determine the home directory; set TASKBOOK_DIR or pass --dir",
        )
    }

    pub fn storage_dir_unavailable(dir: &std::path::Path, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::StorageDirUnavailable,
            format!("cannot create storage directory {}", dir.display()),
        )
        .with_details(err.to_string())
    }

    pub fn storage_write_failed(path: &std::path::Path, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::StorageWriteFailed,
            format!("cannot write {}", path.display()),
        )
        .with_details(err.to_string())
    }
}

impl fmt::Display for TaskbookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.details {
            Some(ref details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for TaskbookError {}

/// Result type for taskbook operations.
pub type TaskbookResult<T> = std::result::Result<T, TaskbookError>;
