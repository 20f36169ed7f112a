//! Configuration file storage.
//!
//! Provides loading of the simulator configuration from
//! ~/.config/tinta/config.toml.

use crate::paths::TintaPaths;
use std::fs;
use std::path::PathBuf;
use tinta_core::config::SimulatorConfig;

/// Errors that can occur during configuration storage operations.
#[derive(Debug)]
pub enum ConfigStorageError {
    /// Configuration file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    ParseError(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::NotFound(path) => {
                write!(f, "Configuration file not found at: {}", path.display())
            }
            ConfigStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigStorageError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
        }
    }
}

impl std::error::Error for ConfigStorageError {}

impl From<std::io::Error> for ConfigStorageError {
    fn from(e: std::io::Error) -> Self {
        ConfigStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for ConfigStorageError {
    fn from(e: toml::de::Error) -> Self {
        ConfigStorageError::ParseError(e)
    }
}

/// Storage for the configuration file (config.toml).
///
/// Responsibilities:
/// - Load config.toml from ~/.config/tinta/
/// - Parse TOML into the SimulatorConfig domain model
/// - Provide error handling for missing or invalid files
///
/// Does NOT:
/// - Write or modify configuration files (read-only)
/// - Validate endpoint URLs or tokens
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a storage pointing at the platform config file location.
    pub fn new() -> Result<Self, ConfigStorageError> {
        let path = TintaPaths::config_file().map_err(|_| ConfigStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a storage pointing at an explicit file, for tests.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads and parses the configuration file.
    pub fn load(&self) -> Result<SimulatorConfig, ConfigStorageError> {
        if !self.path.exists() {
            return Err(ConfigStorageError::NotFound(self.path.clone()));
        }
        let raw = fs::read_to_string(&self.path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Loads the configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_or_default(&self) -> SimulatorConfig {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default configuration: {}", e);
                SimulatorConfig::default()
            }
        }
    }
}
