//! Path management for Poolkeeper
//!
//! ## Path Resolution Order
//!
//! 1. `POOLKEEPER_CONFIG_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (e.g. `~/.config/poolkeeper` on Linux)

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::error::PoolkeeperError;

/// Manages all paths used by Poolkeeper
#[derive(Debug, Clone)]
pub struct PoolkeeperPaths {
    config_dir: PathBuf,
}

impl PoolkeeperPaths {
    /// Resolve the config directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and no
    /// override is set.
    pub fn new() -> Result<Self, PoolkeeperError> {
        if let Ok(custom) = std::env::var("POOLKEEPER_CONFIG_DIR") {
            return Ok(Self::with_config_dir(PathBuf::from(custom)));
        }

        let dirs = ProjectDirs::from("", "", "poolkeeper").ok_or_else(|| {
            PoolkeeperError::Config("Could not determine a config directory".into())
        })?;

        Ok(Self::with_config_dir(dirs.config_dir().to_path_buf()))
    }

    /// Use a specific config directory (useful for testing)
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// The config directory
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_file_under_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PoolkeeperPaths::with_config_dir(temp_dir.path().to_path_buf());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.config_dir(), temp_dir.path());
    }
}
