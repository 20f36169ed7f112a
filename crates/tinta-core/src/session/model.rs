//! Session domain model.
//!
//! A session is the unit of persistence: every room the customer uploaded
//! in one editing pass, plus the selection state needed to resume it.

use crate::paint::Paint;
use crate::room::Room;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a paint operation is in flight.
///
/// This is session-wide rather than per-room: the UI contract allows only
/// one recolor call at a time, and the flag lives on the session object
/// guarded by the single owning task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaintingStatus {
    /// No recolor call in flight.
    #[default]
    Idle,
    /// A recolor call is in flight; further paint requests are rejected.
    Painting,
}

/// The persisted unit of work: all rooms and selection state for one
/// customer editing pass.
///
/// Invariants:
/// - `active_room_id`, when set, references a room in `rooms`;
/// - `selected_wall_id`, when set, references a wall of the active room.
///
/// The fields marked `serde(skip)` are transient UI state; they reset when
/// a session is loaded from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorSession {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable session name
    pub name: String,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
    /// Rooms in insertion order
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// The room currently being edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_room_id: Option<String>,
    /// The wall currently selected in the active room
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_wall_id: Option<String>,
    /// Session-wide paint-in-flight status (transient)
    #[serde(skip)]
    pub painting: PaintingStatus,
    /// Wall hovered for preview (transient; cleared on room switch)
    #[serde(skip)]
    pub hovered_wall_id: Option<String>,
    /// Paint picked from the catalog for the next apply (transient)
    #[serde(skip)]
    pub selected_paint: Option<Paint>,
}

impl SimulatorSession {
    /// Creates an empty session with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: now.clone(),
            updated_at: now,
            rooms: Vec::new(),
            active_room_id: None,
            selected_wall_id: None,
            painting: PaintingStatus::default(),
            hovered_wall_id: None,
            selected_paint: None,
        }
    }

    /// Refreshes `updated_at` to the current time.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// Listing entry for the session picker, ordered most-recently-updated
/// first by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session identifier
    pub id: String,
    /// Session display name
    pub name: String,
    /// Timestamp of the last save (ISO 8601 format)
    pub updated_at: String,
}
