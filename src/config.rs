//! Configuration loading.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. YAML file: `--config`, `TASKBOOK_CONFIG_PATH`, or `~/.taskbook/config.yaml`
//! 3. Environment: `TASKBOOK_DIR`
//! 4. Command-line overrides (applied by the binary)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "TASKBOOK_CONFIG_PATH";

/// Environment variable overriding the storage directory.
pub const STORAGE_DIR_ENV: &str = "TASKBOOK_DIR";

/// Name of the per-user config file inside the storage directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Task book configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Where the task book lives on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage directory. Defaults to `~/.taskbook`.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Document file name inside the storage directory.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_name: default_file_name(),
        }
    }
}

fn default_file_name() -> String {
    crate::paths::DEFAULT_FILE_NAME.to_string()
}

/// Presenter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Print the completion summary below the boards.
    #[serde(default = "default_show_footer")]
    pub show_footer: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_footer: default_show_footer(),
        }
    }
}

fn default_show_footer() -> bool {
    true
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from the process environment and default locations.
    ///
    /// An explicitly named file must exist. The per-user file is optional.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        Self::discover_with(explicit, |key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// [`discover`](Self::discover) with injectable environment and home directory.
    pub fn discover_with<F>(explicit: Option<&Path>, env: F, home: Option<PathBuf>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let user_file = home.map(|h| {
                    h.join(crate::paths::DEFAULT_DIR_NAME)
                        .join(CONFIG_FILE_NAME)
                });
                match user_file {
                    Some(path) if path.is_file() => Self::load(path)?,
                    _ => Self::default(),
                }
            }
        };

        config.apply_env(env);
        Ok(config)
    }

    /// Apply environment overrides.
    pub fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = env(STORAGE_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            self.storage.dir = Some(PathBuf::from(dir));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.storage.dir.is_none());
        assert_eq!(config.storage.file_name, "taskbook.json");
        assert!(config.display.show_footer);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "display:\n  show_footer: false\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.display.show_footer);
        assert_eq!(config.storage.file_name, "taskbook.json");
    }

    #[test]
    fn test_discover_without_files_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::discover_with(None, no_env, Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_discover_reads_user_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".taskbook");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.yaml"), "storage:\n  file_name: book.json\n").unwrap();

        let config = Config::discover_with(None, no_env, Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(config.storage.file_name, "book.json");
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");
        assert!(Config::discover_with(Some(&missing), no_env, None).is_err());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "storage: [unclosed").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_env_overrides_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "storage:\n  dir: /from/file\n").unwrap();

        let env = |key: &str| match key {
            STORAGE_DIR_ENV => Some("/from/env".to_string()),
            _ => None,
        };
        let config = Config::discover_with(Some(&path), env, None).unwrap();
        assert_eq!(config.storage.dir, Some(PathBuf::from("/from/env")));
    }

    #[test]
    fn test_config_path_from_env() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yaml");
        std::fs::write(&path, "storage:\n  file_name: custom.json\n").unwrap();

        let path_str = path.to_string_lossy().to_string();
        let env = move |key: &str| match key {
            CONFIG_PATH_ENV => Some(path_str.clone()),
            _ => None,
        };
        let config = Config::discover_with(None, env, None).unwrap();
        assert_eq!(config.storage.file_name, "custom.json");
    }
}
