//! State repository trait.

use async_trait::async_trait;

use anyhow::Result;

/// Repository for the single "last opened session" pointer.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Returns the most recently opened session id, if one is recorded.
    async fn get_active_session(&self) -> Option<String>;

    /// Records the most recently opened session id.
    async fn set_active_session(&self, session_id: String) -> Result<()>;

    /// Clears the pointer, e.g. after the pointed-at session is deleted.
    async fn clear_active_session(&self) -> Result<()>;
}
