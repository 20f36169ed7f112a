//! Application state domain models.
//!
//! Contains application-level state that persists across launches.

use serde::{Deserialize, Serialize};

/// Application state that persists across restarts.
///
/// # Fields
///
/// * `active_session_id` - The ID of the most recently opened session,
///   used to resume it on the next launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// ID of the most recently opened session.
    pub active_session_id: Option<String>,
}

impl AppState {
    /// Creates a new AppState with default values.
    pub fn new() -> Self {
        Self::default()
    }
}
