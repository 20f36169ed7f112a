//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use super::model::{SessionSummary, SimulatorSession};
use anyhow::Result;
use async_trait::async_trait;

/// An abstract repository for managing session persistence.
///
/// This trait defines the contract for persisting and retrieving simulator
/// sessions, decoupling the application's core logic from the specific
/// storage mechanism (e.g., JSON files, database, remote API).
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(session))`: Session found, fully hydrated
    /// - `Ok(None)`: Session not found
    /// - `Err(_)`: Error occurred during retrieval (including a partially
    ///   readable record; sessions are never partially hydrated)
    async fn find_by_id(&self, session_id: &str) -> Result<Option<SimulatorSession>>;

    /// Saves a session to storage (upsert by id).
    ///
    /// Implementations must refresh the stored `updated_at` timestamp on
    /// every call.
    async fn save(&self, session: &SimulatorSession) -> Result<()>;

    /// Deletes a session from storage.
    ///
    /// Deleting a session that does not exist is not an error.
    async fn delete(&self, session_id: &str) -> Result<()>;

    /// Lists summaries of all stored sessions, most recently updated first.
    async fn list_summaries(&self) -> Result<Vec<SessionSummary>>;
}
