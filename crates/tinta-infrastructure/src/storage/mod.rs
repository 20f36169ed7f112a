//! Storage backends for configuration files.

mod config_storage;

pub use config_storage::{ConfigStorage, ConfigStorageError};
