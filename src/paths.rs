//! Storage location resolution.
//!
//! The location is resolved once at startup and passed explicitly to
//! [`storage::load`](crate::storage::load) and [`storage::save`](crate::storage::save).

use crate::config::Config;
use crate::error::{TaskbookError, TaskbookResult};
use std::path::{Path, PathBuf};

/// Directory under the home directory holding the task book.
pub const DEFAULT_DIR_NAME: &str = ".taskbook";

/// Default document name.
pub const DEFAULT_FILE_NAME: &str = "taskbook.json";

/// Resolved storage directory and document path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    dir: PathBuf,
    file: PathBuf,
}

impl StoragePaths {
    /// Use an explicit directory and file name.
    pub fn new(dir: impl Into<PathBuf>, file_name: &str) -> Self {
        let dir = dir.into();
        let file = dir.join(file_name);
        Self { dir, file }
    }

    /// Resolve from configuration, falling back to `~/.taskbook`.
    ///
    /// Without a configured directory and without a home directory there is
    /// no sane place to keep data, so this is fatal.
    pub fn resolve(config: &Config) -> TaskbookResult<Self> {
        Self::resolve_with_home(config, dirs::home_dir())
    }

    pub fn resolve_with_home(config: &Config, home: Option<PathBuf>) -> TaskbookResult<Self> {
        let dir = match config.storage.dir {
            Some(ref dir) => dir.clone(),
            None => home
                .map(|h| h.join(DEFAULT_DIR_NAME))
                .ok_or_else(TaskbookError::home_dir_unavailable)?,
        };
        Ok(Self::new(dir, &config.storage.file_name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_default_location_under_home() {
        let paths =
            StoragePaths::resolve_with_home(&Config::default(), Some(PathBuf::from("/home/ann")))
                .unwrap();
        assert_eq!(paths.dir(), Path::new("/home/ann/.taskbook"));
        assert_eq!(paths.file(), Path::new("/home/ann/.taskbook/taskbook.json"));
    }

    #[test]
    fn test_configured_dir_wins() {
        let mut config = Config::default();
        config.storage.dir = Some(PathBuf::from("/srv/tb"));
        config.storage.file_name = "book.json".to_string();

        let paths = StoragePaths::resolve_with_home(&config, None).unwrap();
        assert_eq!(paths.file(), Path::new("/srv/tb/book.json"));
    }

    #[test]
    fn test_missing_home_is_fatal() {
        let err = StoragePaths::resolve_with_home(&Config::default(), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::HomeDirUnavailable);
        assert!(err.is_fatal());
    }
}
