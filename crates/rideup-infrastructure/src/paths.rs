//! Unified path management for rideup files.
//!
//! All paths are resolved via AppPaths from the version-migrate crate so the
//! config file and the document store agree on platform directories.

use std::path::PathBuf;
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for rideup_core::RideupError {
    fn from(err: PathError) -> Self {
        rideup_core::RideupError::config(err.to_string())
    }
}

/// Unified path management for rideup.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/rideup/            # Config directory (AppPaths default)
/// └── config.toml              # Versioned configuration
///
/// ~/.local/share/rideup/       # Data directory
/// ├── store/                   # JSON document store
/// │   └── users/
/// │       └── <identity>.json
/// └── logs/                    # Daily-rotated logs
///     └── rideup.log.YYYY-MM-DD
/// ```
pub struct RideupPaths;

impl RideupPaths {
    /// Returns a configured AppPaths instance for rideup.
    fn app_paths() -> AppPaths {
        AppPaths::new("rideup")
    }

    /// Returns the rideup configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the rideup data directory.
    pub fn data_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .data_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default root of the JSON document store.
    pub fn store_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("store"))
    }

    /// Returns the directory for rotated log files.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_app_directories() {
        // Home may be unavailable in sandboxed CI; only check layout when it is.
        if let (Ok(config_dir), Ok(config_file)) =
            (RideupPaths::config_dir(), RideupPaths::config_file())
        {
            assert_eq!(config_file, config_dir.join("config.toml"));
        }
        if let (Ok(data_dir), Ok(store_dir)) = (RideupPaths::data_dir(), RideupPaths::store_dir())
        {
            assert!(store_dir.starts_with(data_dir));
        }
    }
}
