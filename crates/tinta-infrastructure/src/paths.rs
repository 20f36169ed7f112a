//! Unified path management for Tinta configuration and data files.
//!
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find configuration directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for Tinta.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/tinta/             # Config directory
/// ├── config.toml              # Application configuration
/// ├── sessions/                # Session files (one JSON per session)
/// │   └── <session-id>.json
/// └── active_session.txt       # Most recently opened session id
/// ```
pub struct TintaPaths;

impl TintaPaths {
    /// Returns the Tinta configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/tinta/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("tinta"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path of the configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
