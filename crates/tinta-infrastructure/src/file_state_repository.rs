//! File-backed StateRepository implementation.
//!
//! The "last opened session" pointer is a single text file next to the
//! sessions directory, so resuming on the next launch costs one read.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tinta_core::state::StateRepository;
use tokio::fs;

const ACTIVE_SESSION_FILE: &str = "active_session.txt";

/// Stores the most recently opened session id in a plain text file.
pub struct FileStateRepository {
    base_dir: PathBuf,
}

impl FileStateRepository {
    /// Creates a new `FileStateRepository` with the specified base
    /// directory, creating it if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir).context("Failed to create state directory")?;
        Ok(Self { base_dir })
    }

    /// Creates a repository at the default location (~/.config/tinta).
    pub fn default_location() -> Result<Self> {
        let base_dir = crate::paths::TintaPaths::config_dir()
            .context("Failed to get config directory")?;
        Self::new(base_dir)
    }

    fn pointer_path(&self) -> PathBuf {
        self.base_dir.join(ACTIVE_SESSION_FILE)
    }
}

#[async_trait]
impl StateRepository for FileStateRepository {
    async fn get_active_session(&self) -> Option<String> {
        let raw = fs::read_to_string(self.pointer_path()).await.ok()?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    async fn set_active_session(&self, session_id: String) -> Result<()> {
        fs::write(self.pointer_path(), session_id)
            .await
            .context("Failed to write active session pointer")?;
        Ok(())
    }

    async fn clear_active_session(&self) -> Result<()> {
        let path = self.pointer_path();
        if fs::try_exists(&path).await.unwrap_or(false) {
            fs::remove_file(&path)
                .await
                .context("Failed to clear active session pointer")?;
        }
        Ok(())
    }
}
