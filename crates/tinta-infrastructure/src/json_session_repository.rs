//! JSON-file SessionRepository implementation.
//!
//! Each session is stored as one pretty-printed JSON file under a
//! `sessions/` directory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tinta_core::session::{SessionRepository, SessionSummary, SimulatorSession};
use tokio::fs;

/// Persistence record for one session.
///
/// The listing fields (`id`, `name`, `updated_at`) are duplicated outside
/// `data` so the session picker can be built from the record head without
/// touching the room history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    id: String,
    name: String,
    created_at: String,
    updated_at: String,
    data: SimulatorSession,
}

/// A repository implementation storing sessions as JSON files.
///
/// Directory structure:
/// ```text
/// base_dir/
/// ├── sessions/
/// │   ├── session-id-1.json
/// │   └── session-id-2.json
/// └── active_session.txt
/// ```
pub struct JsonSessionRepository {
    base_dir: PathBuf,
}

impl JsonSessionRepository {
    /// Creates a new `JsonSessionRepository` with the specified base
    /// directory, creating the directory structure if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(base_dir.join("sessions"))
            .context("Failed to create sessions directory")?;
        Ok(Self { base_dir })
    }

    /// Creates a repository at the default location (~/.config/tinta).
    pub fn default_location() -> Result<Self> {
        let base_dir = crate::paths::TintaPaths::config_dir()
            .context("Failed to get config directory")?;
        Self::new(base_dir)
    }

    /// Returns the file path for a given session ID.
    fn session_file_path(&self, session_id: &str) -> PathBuf {
        self.base_dir
            .join("sessions")
            .join(format!("{}.json", session_id))
    }

    async fn read_record(&self, path: &Path) -> Result<StoredSession> {
        let json = fs::read_to_string(path)
            .await
            .context(format!("Failed to read session file: {:?}", path))?;
        let record: StoredSession =
            serde_json::from_str(&json).context("Failed to deserialize session record")?;
        Ok(record)
    }
}

#[async_trait]
impl SessionRepository for JsonSessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<SimulatorSession>> {
        let path = self.session_file_path(session_id);
        match fs::try_exists(&path).await {
            Ok(true) => {}
            _ => return Ok(None),
        }
        let record = self.read_record(&path).await?;
        Ok(Some(record.data))
    }

    async fn save(&self, session: &SimulatorSession) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut data = session.clone();
        data.updated_at = now.clone();

        let record = StoredSession {
            id: data.id.clone(),
            name: data.name.clone(),
            created_at: data.created_at.clone(),
            updated_at: now,
            data,
        };

        let json = serde_json::to_string_pretty(&record)
            .context("Failed to serialize session record")?;
        let path = self.session_file_path(&record.id);
        fs::write(&path, json)
            .await
            .context(format!("Failed to write session file: {:?}", path))?;

        tracing::debug!(session_id = %record.id, "session saved");
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let path = self.session_file_path(session_id);
        if fs::try_exists(&path).await.unwrap_or(false) {
            fs::remove_file(&path)
                .await
                .context(format!("Failed to delete session file: {:?}", path))?;
        }
        Ok(())
    }

    async fn list_summaries(&self) -> Result<Vec<SessionSummary>> {
        let sessions_dir = self.base_dir.join("sessions");
        let mut entries = fs::read_dir(&sessions_dir)
            .await
            .context("Failed to read sessions directory")?;

        let mut summaries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match self.read_record(&path).await {
                Ok(record) => summaries.push(SessionSummary {
                    id: record.id,
                    name: record.name,
                    updated_at: record.updated_at,
                }),
                Err(e) => {
                    tracing::warn!("skipping unreadable session file {:?}: {}", path, e);
                }
            }
        }

        // Most recently updated first
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}
