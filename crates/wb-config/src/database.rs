//! libSQL database configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Path used for throwaway databases.
pub const IN_MEMORY: &str = ":memory:";

fn default_path() -> String {
    ".waybill/waybill.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database file path, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }

    /// Directory that must exist before the database file can be opened.
    ///
    /// `None` for in-memory databases and bare file names.
    pub fn parent_dir(&self) -> Option<&Path> {
        if self.is_in_memory() {
            return None;
        }
        Path::new(&self.path)
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }

    /// Reject values that cannot name a database.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the path is empty or names a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if !self.is_in_memory() && PathBuf::from(&self.path).is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: format!("'{}' is a directory", self.path),
            });
        }
        Ok(())
    }
}
