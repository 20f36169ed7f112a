//! Room domain models.
//!
//! A `Room` is one uploaded environment photo plus everything derived from
//! it: the walls the detection service found, the color simulations applied
//! so far, and the analysis status flags.

use crate::paint::Paint;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A paintable surface identified by the detection service in a room photo.
///
/// Walls are immutable once produced; a re-analysis replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedWall {
    /// Surface identifier, as returned by the detection service
    pub id: String,
    /// Localized label shown to the user, e.g. "Parede Norte"
    pub label: String,
    /// Machine-oriented label, when the service provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_label: Option<String>,
    /// Free-form description of the surface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The record of one color applied to one wall.
///
/// At most one simulation per `(room, wall_id)` is live at a time; applying
/// a new color to the same wall supersedes the previous record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallSimulation {
    /// Unique simulation identifier (UUID format)
    pub id: String,
    /// Id of the wall this simulation targets
    pub wall_id: String,
    /// Human label of the wall at the time of painting
    pub wall_label: String,
    /// The paint that was applied
    pub paint: Paint,
    /// Resulting recolored image
    pub image_url: String,
    /// Timestamp when the simulation was created (ISO 8601 format)
    pub created_at: String,
    /// Whether the recolor call for this record is still in flight
    #[serde(default)]
    pub is_painting: bool,
}

impl WallSimulation {
    /// Creates a completed simulation record for a wall.
    pub fn new(wall: &DetectedWall, paint: Paint, image_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            wall_id: wall.id.clone(),
            wall_label: wall.label.clone(),
            paint,
            image_url: image_url.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            is_painting: false,
        }
    }
}

/// One uploaded environment photo and its derived state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique room identifier (UUID format), generated client-side
    pub id: String,
    /// Display label, auto-numbered on creation
    pub name: String,
    /// The currently displayed image: the original upload, or the most
    /// recent recolor result
    pub image_url: String,
    /// The untouched upload; never overwritten after creation
    pub original_image_url: String,
    /// Walls found by the detection service; empty until analysis completes
    #[serde(default)]
    pub walls: Vec<DetectedWall>,
    /// True while a detection call for this room is in flight
    pub is_analyzing: bool,
    /// True once detection completed successfully (even with zero walls)
    pub is_analyzed: bool,
    /// Color simulations applied to this room, in insertion order
    #[serde(default)]
    pub simulations: Vec<WallSimulation>,
    /// Which simulation's image is shown in compare mode; `None` shows the
    /// original upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_simulation_id: Option<String>,
}

impl Room {
    /// Creates a room in the analyzing state for a fresh upload.
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        let image_url = image_url.into();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            original_image_url: image_url.clone(),
            image_url,
            walls: Vec::new(),
            is_analyzing: true,
            is_analyzed: false,
            simulations: Vec::new(),
            active_simulation_id: None,
        }
    }

    /// Looks up a wall by id.
    pub fn wall(&self, wall_id: &str) -> Option<&DetectedWall> {
        self.walls.iter().find(|w| w.id == wall_id)
    }

    /// The live simulation for a wall, if one exists.
    pub fn simulation_for_wall(&self, wall_id: &str) -> Option<&WallSimulation> {
        self.simulations.iter().find(|s| s.wall_id == wall_id)
    }
}
