//! JSON persistence for the task book.
//!
//! The document is pretty-printed so it diffs cleanly:
//!
//! ```json
//! {
//!   "version": 1,
//!   "nextId": 3,
//!   "boards": {
//!     "#coding": {
//!       "tag": "#coding",
//!       "tasks": [{ "id": 1, "description": "fix bug", "status": 0 }]
//!     }
//!   }
//! }
//! ```
//!
//! `nextId` and `boards` are required. Status ordinals: Pending=0,
//! InProgress=1, Completed=2, Note=3. A change to that mapping must bump
//! [`DOCUMENT_VERSION`].

use crate::error::{ErrorCode, TaskbookError, TaskbookResult};
use crate::store::Collection;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Version of the stored document layout.
pub const DOCUMENT_VERSION: u32 = 1;

/// Low-level failures while encoding or decoding a document.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported document version {0}")]
    UnsupportedVersion(u32),

    #[error("task ids exhausted at {0}")]
    IdsExhausted(u64),
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u32,
    #[serde(flatten)]
    collection: &'a Collection,
}

#[derive(Deserialize)]
struct Document {
    // Documents written before versioning carry no field and use layout 1.
    #[serde(default = "first_version")]
    version: u32,
    #[serde(flatten)]
    collection: Collection,
}

fn first_version() -> u32 {
    1
}

/// Encode a collection as a pretty-printed document with a trailing newline.
pub fn to_json(collection: &Collection) -> Result<String, StorageError> {
    let mut json = serde_json::to_string_pretty(&DocumentRef {
        version: DOCUMENT_VERSION,
        collection,
    })?;
    json.push('\n');
    Ok(json)
}

/// Decode a document, repairing the id counter if needed.
pub fn from_json(json: &str) -> Result<Collection, StorageError> {
    from_slice(json.as_bytes())
}

/// Decode a document from raw file bytes. Invalid UTF-8 is a decode error.
pub fn from_slice(bytes: &[u8]) -> Result<Collection, StorageError> {
    let document: Document = serde_json::from_slice(bytes)?;
    if document.version != DOCUMENT_VERSION {
        return Err(StorageError::UnsupportedVersion(document.version));
    }
    let mut collection = document.collection;
    collection.repair()?;
    Ok(collection)
}

/// Load the collection at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn try_load(path: &Path) -> TaskbookResult<Option<Collection>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(TaskbookError::storage_unreadable(path, e)),
    };

    match from_slice(&bytes) {
        Ok(collection) => Ok(Some(collection)),
        Err(StorageError::UnsupportedVersion(version)) => {
            Err(TaskbookError::unsupported_version(path, version))
        }
        Err(e) => Err(TaskbookError::storage_malformed(path, e)),
    }
}

/// Load the collection at `path`, starting fresh when that is not possible.
///
/// A file that exists but cannot be decoded is moved aside first so the next
/// save does not overwrite the only copy.
pub fn load(path: &Path) -> Collection {
    match try_load(path) {
        Ok(Some(collection)) => {
            debug!(
                path = %path.display(),
                boards = collection.board_count(),
                next_id = collection.next_id(),
                "Loaded task book"
            );
            collection
        }
        Ok(None) => {
            debug!(path = %path.display(), "No task book yet; starting empty");
            Collection::new()
        }
        Err(err) => {
            warn!(code = ?err.code, "{}; starting with an empty task book", err);
            if err.code != ErrorCode::StorageUnreadable {
                quarantine(path);
            }
            Collection::new()
        }
    }
}

/// Path a corrupt document is moved to.
pub fn quarantine_path(path: &Path) -> PathBuf {
    let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".corrupt-{}", stamp));
    path.with_file_name(name)
}

fn quarantine(path: &Path) {
    let target = quarantine_path(path);
    match fs::rename(path, &target) {
        Ok(()) => info!(
            from = %path.display(),
            to = %target.display(),
            "Moved unreadable task book aside"
        ),
        Err(e) => warn!(
            path = %path.display(),
            error = %e,
            "Could not move unreadable task book aside"
        ),
    }
}

/// Save the collection to `path`.
///
/// Creates the containing directory if needed. The document is written to a
/// temporary file in the same directory and renamed over the target, so a
/// crash mid-write leaves the previous file intact.
pub fn save(collection: &Collection, path: &Path) -> TaskbookResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| TaskbookError::storage_dir_unavailable(dir, e))?;

    let json = to_json(collection).map_err(|e| TaskbookError::storage_write_failed(path, e))?;
    write_atomic(dir, path, json.as_bytes())
        .map_err(|e| TaskbookError::storage_write_failed(path, e))?;

    debug!(
        path = %path.display(),
        boards = collection.board_count(),
        tasks = collection.task_count(),
        "Saved task book"
    );
    Ok(())
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
