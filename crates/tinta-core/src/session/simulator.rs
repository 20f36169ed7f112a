//! State machine transitions over [`SimulatorSession`].
//!
//! Every mutation here replaces whole `Room` values inside `rooms` rather
//! than mutating shared fields in place, so a renderer holding a cloned
//! snapshot always observes a consistent state. Detection and recolor
//! results are applied by room id: a result for a room that has since been
//! removed is discarded without touching the session.

use super::model::{PaintingStatus, SimulatorSession};
use crate::error::{Result, TintaError};
use crate::paint::Paint;
use crate::room::{DetectedWall, Room, WallSimulation};

impl SimulatorSession {
    /// Looks up a room by id.
    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    /// The room currently being edited, if any.
    pub fn active_room(&self) -> Option<&Room> {
        self.active_room_id
            .as_deref()
            .and_then(|id| self.room(id))
    }

    /// Display label for the next uploaded room, e.g. "Ambiente 3".
    pub fn next_room_name(&self) -> String {
        format!("Ambiente {}", self.rooms.len() + 1)
    }

    /// Appends a freshly uploaded room (in the analyzing state), makes it
    /// the active room, and clears the wall selection and hover preview.
    pub fn insert_room(&mut self, room: Room) {
        self.active_room_id = Some(room.id.clone());
        self.selected_wall_id = None;
        self.hovered_wall_id = None;
        self.rooms.push(room);
    }

    /// Applies a successful detection result to the room with the given id.
    ///
    /// The room leaves the analyzing state as analyzed, its wall list is
    /// replaced with the response (service order, never re-sorted), and,
    /// when the room is still the active one, the first wall is
    /// auto-selected. Zero walls is a valid terminal state here; the caller
    /// reports it as an advisory, not a failure.
    ///
    /// Returns `false` when the room is no longer part of the session; the
    /// late result is discarded.
    pub fn apply_analysis_success(&mut self, room_id: &str, walls: Vec<DetectedWall>) -> bool {
        let Some(index) = self.rooms.iter().position(|r| r.id == room_id) else {
            return false;
        };

        let mut room = self.rooms[index].clone();
        room.is_analyzing = false;
        room.is_analyzed = true;
        room.walls = walls;

        let first_wall_id = room.walls.first().map(|w| w.id.clone());
        self.rooms[index] = room;

        if self.active_room_id.as_deref() == Some(room_id) {
            self.selected_wall_id = first_wall_id;
        }
        true
    }

    /// Applies a failed detection to the room with the given id.
    ///
    /// The room ends with `is_analyzing = false, is_analyzed = false` and an
    /// empty wall list. This terminal state is observably distinct from
    /// "analyzed with zero walls" only through the `is_analyzed` flag, and
    /// the asymmetry is intentional.
    ///
    /// Returns `false` when the room is no longer part of the session.
    pub fn apply_analysis_failure(&mut self, room_id: &str) -> bool {
        let Some(index) = self.rooms.iter().position(|r| r.id == room_id) else {
            return false;
        };

        let mut room = self.rooms[index].clone();
        room.is_analyzing = false;
        room.is_analyzed = false;
        room.walls = Vec::new();
        self.rooms[index] = room;
        true
    }

    /// Removes a room by identity so it can be re-analyzed under a new id.
    ///
    /// Returns the removed room. Retry is a full replacement, never an
    /// in-place mutation: the old id disappears from the session and the
    /// re-upload gets a fresh one.
    pub fn take_room(&mut self, room_id: &str) -> Result<Room> {
        let index = self
            .rooms
            .iter()
            .position(|r| r.id == room_id)
            .ok_or_else(|| TintaError::not_found("room", room_id))?;
        let room = self.rooms.remove(index);
        if self.active_room_id.as_deref() == Some(room_id) {
            self.active_room_id = None;
            self.selected_wall_id = None;
            self.hovered_wall_id = None;
        }
        Ok(room)
    }

    /// Makes a different room the active one.
    ///
    /// The hover preview is transient cross-room state and is cleared; the
    /// wall selection is left for the caller to update, since the new
    /// room's walls carry different ids.
    pub fn select_room(&mut self, room_id: &str) -> Result<()> {
        if self.room(room_id).is_none() {
            return Err(TintaError::not_found("room", room_id));
        }
        self.active_room_id = Some(room_id.to_string());
        self.hovered_wall_id = None;
        Ok(())
    }

    /// Selects a wall of the active room.
    pub fn select_wall(&mut self, wall_id: &str) -> Result<()> {
        let room = self
            .active_room()
            .ok_or_else(|| TintaError::validation("No active room to select a wall in"))?;
        if room.wall(wall_id).is_none() {
            return Err(TintaError::not_found("wall", wall_id));
        }
        self.selected_wall_id = Some(wall_id.to_string());
        Ok(())
    }

    /// Clears the wall selection.
    pub fn clear_wall_selection(&mut self) {
        self.selected_wall_id = None;
    }

    /// Sets or clears the transient hover preview.
    pub fn hover_wall(&mut self, wall_id: Option<String>) {
        self.hovered_wall_id = wall_id;
    }

    /// Sets or clears the paint picked for the next apply.
    pub fn select_paint(&mut self, paint: Option<Paint>) {
        self.selected_paint = paint;
    }

    /// Marks the session as having a recolor call in flight.
    ///
    /// Fails with a validation error when a paint operation is already
    /// running; only one is allowed at a time.
    pub fn begin_painting(&mut self) -> Result<()> {
        if self.painting == PaintingStatus::Painting {
            return Err(TintaError::validation(
                "A paint operation is already in progress",
            ));
        }
        self.painting = PaintingStatus::Painting;
        Ok(())
    }

    /// Clears the paint-in-flight status, on success and failure alike.
    pub fn finish_painting(&mut self) {
        self.painting = PaintingStatus::Idle;
    }

    /// Applies a successful recolor result to the room with the given id.
    ///
    /// Any existing simulation for the same wall is removed before the new
    /// record is appended, keeping the one-live-simulation-per-wall
    /// invariant, and the room's displayed image is replaced with the
    /// returned one.
    ///
    /// Returns `false` when the room is no longer part of the session.
    pub fn apply_recolor(
        &mut self,
        room_id: &str,
        wall: &DetectedWall,
        paint: Paint,
        image_url: &str,
    ) -> bool {
        let Some(index) = self.rooms.iter().position(|r| r.id == room_id) else {
            return false;
        };

        let simulation = WallSimulation::new(wall, paint, image_url);
        let simulation_id = simulation.id.clone();

        let mut room = self.rooms[index].clone();
        room.simulations.retain(|s| s.wall_id != wall.id);
        room.simulations.push(simulation);
        room.image_url = image_url.to_string();
        room.active_simulation_id = Some(simulation_id);
        self.rooms[index] = room;
        true
    }

    /// Removes a simulation from the active room.
    ///
    /// When the last simulation goes away the displayed image falls back to
    /// the original upload; otherwise `image_url` is left as-is, which means
    /// it keeps showing the most recent recolor even if that was the removed
    /// entry. The stale-image case is carried over as observed behavior.
    pub fn remove_simulation(&mut self, simulation_id: &str) -> Result<()> {
        let room_id = self
            .active_room_id
            .clone()
            .ok_or_else(|| TintaError::validation("No active room"))?;
        let index = self
            .rooms
            .iter()
            .position(|r| r.id == room_id)
            .ok_or_else(|| TintaError::not_found("room", room_id.clone()))?;

        let mut room = self.rooms[index].clone();
        let before = room.simulations.len();
        room.simulations.retain(|s| s.id != simulation_id);
        if room.simulations.len() == before {
            return Err(TintaError::not_found("simulation", simulation_id));
        }

        if room.simulations.is_empty() {
            room.image_url = room.original_image_url.clone();
        }
        if room.active_simulation_id.as_deref() == Some(simulation_id) {
            room.active_simulation_id = None;
        }
        self.rooms[index] = room;
        Ok(())
    }

    /// Removes a room from the session.
    ///
    /// When the removed room was active, the first remaining room becomes
    /// active (or none when the session is empty) and the wall selection is
    /// cleared.
    pub fn clear_room(&mut self, room_id: &str) -> Result<()> {
        let index = self
            .rooms
            .iter()
            .position(|r| r.id == room_id)
            .ok_or_else(|| TintaError::not_found("room", room_id))?;
        self.rooms.remove(index);

        if self.active_room_id.as_deref() == Some(room_id) {
            self.active_room_id = self.rooms.first().map(|r| r.id.clone());
            self.selected_wall_id = None;
            self.hovered_wall_id = None;
        }
        Ok(())
    }

    /// Points compare mode at a simulation of the active room, or back at
    /// the original upload.
    pub fn set_compare_simulation(&mut self, simulation_id: Option<String>) -> Result<()> {
        let room_id = self
            .active_room_id
            .clone()
            .ok_or_else(|| TintaError::validation("No active room"))?;
        let index = self
            .rooms
            .iter()
            .position(|r| r.id == room_id)
            .ok_or_else(|| TintaError::not_found("room", room_id.clone()))?;

        if let Some(id) = &simulation_id {
            if !self.rooms[index].simulations.iter().any(|s| &s.id == id) {
                return Err(TintaError::not_found("simulation", id.clone()));
            }
        }

        let mut room = self.rooms[index].clone();
        room.active_simulation_id = simulation_id;
        self.rooms[index] = room;
        Ok(())
    }

    /// Clears in-flight flags after a restore from storage.
    ///
    /// A loaded session has no pending network calls: a room persisted
    /// mid-analysis would otherwise stay stuck in the analyzing state
    /// forever, so it is normalized to the failed-analysis terminal state,
    /// and the paint status resets to idle.
    pub fn reset_in_flight(&mut self) {
        let stuck: Vec<String> = self
            .rooms
            .iter()
            .filter(|r| r.is_analyzing)
            .map(|r| r.id.clone())
            .collect();
        for room_id in stuck {
            self.apply_analysis_failure(&room_id);
        }
        self.painting = PaintingStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(id: &str, label: &str) -> DetectedWall {
        DetectedWall {
            id: id.to_string(),
            label: label.to_string(),
            ml_label: None,
            description: None,
        }
    }

    fn session_with_analyzed_room(walls: Vec<DetectedWall>) -> (SimulatorSession, String) {
        let mut session = SimulatorSession::new("Test");
        let room = Room::new(session.next_room_name(), "data:image/jpeg;base64,orig");
        let room_id = room.id.clone();
        session.insert_room(room);
        assert!(session.apply_analysis_success(&room_id, walls));
        (session, room_id)
    }

    fn verde() -> Paint {
        Paint::new("Verde Esmeralda", "VE-01", "#50C878", "Verdes")
    }

    fn azul() -> Paint {
        Paint::new("Azul Sereno", "AZ-02", "#4A90D9", "Azuis")
    }

    #[test]
    fn test_insert_room_activates_and_clears_selection() {
        let mut session = SimulatorSession::new("Test");
        session.hovered_wall_id = Some("stale".to_string());
        let room = Room::new("Ambiente 1", "img");
        let room_id = room.id.clone();
        session.insert_room(room);

        assert_eq!(session.active_room_id.as_deref(), Some(room_id.as_str()));
        assert!(session.selected_wall_id.is_none());
        assert!(session.hovered_wall_id.is_none());
        assert!(session.active_room().unwrap().is_analyzing);
    }

    #[test]
    fn test_room_names_are_auto_numbered() {
        let mut session = SimulatorSession::new("Test");
        assert_eq!(session.next_room_name(), "Ambiente 1");
        session.insert_room(Room::new(session.next_room_name(), "img"));
        assert_eq!(session.next_room_name(), "Ambiente 2");
    }

    #[test]
    fn test_analysis_success_populates_walls_and_selects_first() {
        let (session, room_id) = session_with_analyzed_room(vec![
            wall("s1", "Parede Norte"),
            wall("s2", "Parede Sul"),
        ]);

        let room = session.room(&room_id).unwrap();
        assert!(!room.is_analyzing);
        assert!(room.is_analyzed);
        assert_eq!(room.walls.len(), 2);
        // Service order is preserved and the first wall is auto-selected.
        assert_eq!(room.walls[0].id, "s1");
        assert_eq!(session.selected_wall_id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_analysis_success_with_zero_walls_is_analyzed() {
        let (session, room_id) = session_with_analyzed_room(Vec::new());
        let room = session.room(&room_id).unwrap();
        assert!(room.is_analyzed);
        assert!(room.walls.is_empty());
        assert!(session.selected_wall_id.is_none());
    }

    #[test]
    fn test_analysis_failure_is_distinct_from_zero_walls() {
        let mut session = SimulatorSession::new("Test");
        let room = Room::new("Ambiente 1", "img");
        let room_id = room.id.clone();
        session.insert_room(room);

        assert!(session.apply_analysis_failure(&room_id));
        let room = session.room(&room_id).unwrap();
        assert!(!room.is_analyzing);
        assert!(!room.is_analyzed);
        assert!(room.walls.is_empty());
    }

    #[test]
    fn test_late_result_for_removed_room_is_discarded() {
        let mut session = SimulatorSession::new("Test");
        let room_a = Room::new("Ambiente 1", "img-a");
        let room_b = Room::new("Ambiente 2", "img-b");
        let id_a = room_a.id.clone();
        let id_b = room_b.id.clone();
        session.insert_room(room_a);
        session.insert_room(room_b);
        session.clear_room(&id_b).unwrap();

        let before = session.clone();
        assert!(!session.apply_analysis_success(&id_b, vec![wall("s1", "Parede Norte")]));
        assert!(!session.apply_analysis_failure(&id_b));
        assert_eq!(session.rooms, before.rooms);
        assert_eq!(session.rooms.len(), 1);
        assert_eq!(session.rooms[0].id, id_a);
    }

    #[test]
    fn test_analysis_success_does_not_steal_selection_from_other_room() {
        let mut session = SimulatorSession::new("Test");
        let room_a = Room::new("Ambiente 1", "img-a");
        let id_a = room_a.id.clone();
        session.insert_room(room_a);
        session.apply_analysis_success(&id_a, vec![wall("a1", "Parede Norte")]);

        let room_b = Room::new("Ambiente 2", "img-b");
        let id_b = room_b.id.clone();
        session.insert_room(room_b);
        session.select_room(&id_a).unwrap();
        session.select_wall("a1").unwrap();

        // Room B's analysis finishes while room A is active.
        assert!(session.apply_analysis_success(&id_b, vec![wall("b1", "Parede Sul")]));
        assert_eq!(session.selected_wall_id.as_deref(), Some("a1"));
        assert!(session.room(&id_b).unwrap().is_analyzed);
    }

    #[test]
    fn test_select_room_clears_hover_but_not_wall_selection() {
        let mut session = SimulatorSession::new("Test");
        let room_a = Room::new("Ambiente 1", "img-a");
        let room_b = Room::new("Ambiente 2", "img-b");
        let id_a = room_a.id.clone();
        let id_b = room_b.id.clone();
        session.insert_room(room_a);
        session.insert_room(room_b);
        session.apply_analysis_success(&id_b, vec![wall("s1", "Parede Norte")]);
        session.hover_wall(Some("s1".to_string()));

        session.select_room(&id_a).unwrap();
        assert!(session.hovered_wall_id.is_none());
        assert_eq!(session.selected_wall_id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_select_wall_requires_wall_in_active_room() {
        let (mut session, _) = session_with_analyzed_room(vec![wall("s1", "Parede Norte")]);
        assert!(session.select_wall("missing").unwrap_err().is_not_found());

        let mut empty = SimulatorSession::new("Test");
        assert!(empty.select_wall("s1").unwrap_err().is_validation());
    }

    #[test]
    fn test_apply_recolor_keeps_one_simulation_per_wall() {
        let (mut session, room_id) = session_with_analyzed_room(vec![wall("s1", "Parede Norte")]);
        let w = wall("s1", "Parede Norte");

        assert!(session.apply_recolor(&room_id, &w, verde(), "https://cdn.example/v1.jpg"));
        assert!(session.apply_recolor(&room_id, &w, azul(), "https://cdn.example/v2.jpg"));

        let room = session.room(&room_id).unwrap();
        let for_wall: Vec<_> = room
            .simulations
            .iter()
            .filter(|s| s.wall_id == "s1")
            .collect();
        assert_eq!(for_wall.len(), 1);
        assert_eq!(for_wall[0].paint.name, "Azul Sereno");
        assert_eq!(room.image_url, "https://cdn.example/v2.jpg");
        assert_eq!(room.active_simulation_id, Some(for_wall[0].id.clone()));
    }

    #[test]
    fn test_apply_recolor_orders_simulations_by_insertion() {
        let (mut session, room_id) = session_with_analyzed_room(vec![
            wall("s1", "Parede Norte"),
            wall("s2", "Parede Sul"),
        ]);

        session.apply_recolor(&room_id, &wall("s2", "Parede Sul"), verde(), "u1");
        session.apply_recolor(&room_id, &wall("s1", "Parede Norte"), azul(), "u2");

        let room = session.room(&room_id).unwrap();
        assert_eq!(room.simulations[0].wall_id, "s2");
        assert_eq!(room.simulations[1].wall_id, "s1");
    }

    #[test]
    fn test_remove_last_simulation_resets_image_to_original() {
        let (mut session, room_id) = session_with_analyzed_room(vec![wall("s1", "Parede Norte")]);
        session.apply_recolor(&room_id, &wall("s1", "Parede Norte"), verde(), "u1");
        let sim_id = session.room(&room_id).unwrap().simulations[0].id.clone();

        session.remove_simulation(&sim_id).unwrap();
        let room = session.room(&room_id).unwrap();
        assert!(room.simulations.is_empty());
        assert_eq!(room.image_url, "data:image/jpeg;base64,orig");
        assert!(room.active_simulation_id.is_none());
    }

    #[test]
    fn test_remove_non_last_simulation_keeps_image() {
        let (mut session, room_id) = session_with_analyzed_room(vec![
            wall("s1", "Parede Norte"),
            wall("s2", "Parede Sul"),
        ]);
        session.apply_recolor(&room_id, &wall("s1", "Parede Norte"), verde(), "u1");
        session.apply_recolor(&room_id, &wall("s2", "Parede Sul"), azul(), "u2");
        let first_sim = session.room(&room_id).unwrap().simulations[0].id.clone();

        session.remove_simulation(&first_sim).unwrap();
        let room = session.room(&room_id).unwrap();
        assert_eq!(room.simulations.len(), 1);
        // The displayed image still shows the latest recolor, even though it
        // may depict the removed wall too.
        assert_eq!(room.image_url, "u2");
    }

    #[test]
    fn test_take_room_drops_identity_for_retry() {
        let (mut session, room_id) = session_with_analyzed_room(vec![wall("s1", "Parede Norte")]);
        let removed = session.take_room(&room_id).unwrap();

        assert_eq!(removed.id, room_id);
        assert!(session.room(&room_id).is_none());
        assert!(session.active_room_id.is_none());
        assert!(session.selected_wall_id.is_none());

        // The re-upload gets a fresh identity.
        let replacement = Room::new("Ambiente 1", removed.original_image_url.clone());
        assert_ne!(replacement.id, room_id);
        session.insert_room(replacement);
        assert_eq!(session.rooms.len(), 1);
    }

    #[test]
    fn test_clear_active_room_selects_first_remaining() {
        let mut session = SimulatorSession::new("Test");
        let room_a = Room::new("Ambiente 1", "img-a");
        let room_b = Room::new("Ambiente 2", "img-b");
        let id_a = room_a.id.clone();
        let id_b = room_b.id.clone();
        session.insert_room(room_a);
        session.insert_room(room_b);

        session.clear_room(&id_b).unwrap();
        assert_eq!(session.active_room_id.as_deref(), Some(id_a.as_str()));
        assert!(session.selected_wall_id.is_none());

        session.clear_room(&id_a).unwrap();
        assert!(session.active_room_id.is_none());
    }

    #[test]
    fn test_clear_inactive_room_keeps_active_selection() {
        let mut session = SimulatorSession::new("Test");
        let room_a = Room::new("Ambiente 1", "img-a");
        let room_b = Room::new("Ambiente 2", "img-b");
        let id_a = room_a.id.clone();
        let id_b = room_b.id.clone();
        session.insert_room(room_a);
        session.insert_room(room_b);
        session.apply_analysis_success(&id_b, vec![wall("s1", "Parede Norte")]);

        session.clear_room(&id_a).unwrap();
        assert_eq!(session.active_room_id.as_deref(), Some(id_b.as_str()));
        assert_eq!(session.selected_wall_id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_begin_painting_rejects_concurrent_paint() {
        let mut session = SimulatorSession::new("Test");
        session.begin_painting().unwrap();
        assert!(session.begin_painting().unwrap_err().is_validation());
        session.finish_painting();
        assert!(session.begin_painting().is_ok());
    }

    #[test]
    fn test_set_compare_simulation_validates_membership() {
        let (mut session, room_id) = session_with_analyzed_room(vec![wall("s1", "Parede Norte")]);
        session.apply_recolor(&room_id, &wall("s1", "Parede Norte"), verde(), "u1");
        let sim_id = session.room(&room_id).unwrap().simulations[0].id.clone();

        session.set_compare_simulation(None).unwrap();
        assert!(session.room(&room_id).unwrap().active_simulation_id.is_none());

        session.set_compare_simulation(Some(sim_id.clone())).unwrap();
        assert_eq!(
            session.room(&room_id).unwrap().active_simulation_id,
            Some(sim_id)
        );

        assert!(
            session
                .set_compare_simulation(Some("missing".to_string()))
                .unwrap_err()
                .is_not_found()
        );
    }

    #[test]
    fn test_reset_in_flight_normalizes_stuck_rooms() {
        let mut session = SimulatorSession::new("Test");
        let room = Room::new("Ambiente 1", "img");
        let room_id = room.id.clone();
        session.insert_room(room);
        session.begin_painting().unwrap();

        session.reset_in_flight();
        let room = session.room(&room_id).unwrap();
        assert!(!room.is_analyzing);
        assert!(!room.is_analyzed);
        assert_eq!(session.painting, PaintingStatus::Idle);
    }
}
