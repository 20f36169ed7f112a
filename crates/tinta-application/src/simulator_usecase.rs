//! Simulator use case implementation.
//!
//! `SimulatorUseCase` coordinates the session state machine with the
//! surface detection and wall recolor clients and with session
//! persistence. All session mutations go through one `RwLock`, so a
//! multi-threaded host gets the same serialization the original
//! single-threaded UI contract provided.
//!
//! Remote results are applied by room id, never through the "current room"
//! pointer: a detection or recolor answer that arrives after its room was
//! removed is discarded without touching the session.

use std::collections::HashMap;
use std::sync::Arc;
use tinta_core::config::SimulatorConfig;
use tinta_core::error::{Result, TintaError};
use tinta_core::paint::Paint;
use tinta_core::room::{RecolorRequest, Room, SurfaceDetector, WallRecolorer};
use tinta_core::session::{SessionRepository, SessionSummary, SimulatorSession};
use tinta_core::state::StateRepository;
use tinta_infrastructure::storage::ConfigStorage;
use tinta_infrastructure::{FileStateRepository, JsonSessionRepository};
use tinta_interaction::{ImagePreprocessor, SurfaceDetectionApiClient, WallRecolorApiClient};
use tokio::sync::{Mutex, RwLock};

/// Outcome of a completed room analysis.
///
/// "No walls" is a success with an advisory, not a failure; a hard failure
/// is reported as an error instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisReport {
    /// Detection finished and found paintable surfaces.
    Analyzed {
        /// Number of walls found
        wall_count: usize,
    },
    /// Detection finished but found no paintable surface in the photo.
    NoWallsDetected,
}

/// Use case for one customer editing pass.
///
/// # Responsibilities
///
/// - Uploading rooms: preprocess, submit for detection, apply the outcome
/// - Painting walls: validate selection, call the recolor service, apply
/// - Selection and comparison state changes
/// - Session lifecycle: create, save, load, list, rename, delete, resume
///
/// # Thread Safety
///
/// The session lives behind a `RwLock`; every mutation takes the write
/// lock, and no lock is held across a remote call.
pub struct SimulatorUseCase {
    /// The single authoritative in-memory session
    session: Arc<RwLock<SimulatorSession>>,
    /// Client for the surface detection service
    detector: Arc<dyn SurfaceDetector>,
    /// Client for the wall recolor service
    recolorer: Arc<dyn WallRecolorer>,
    /// Upload normalization
    preprocessor: ImagePreprocessor,
    /// Repository for session data persistence
    session_repository: Arc<dyn SessionRepository>,
    /// Repository for the "last opened session" pointer
    state_repository: Arc<dyn StateRepository>,
    /// Pristine upload bytes per room id, kept for analysis retries
    original_uploads: Mutex<HashMap<String, Arc<Vec<u8>>>>,
}

const DEFAULT_SESSION_NAME: &str = "Simulação";

impl SimulatorUseCase {
    /// Creates a use case with a fresh, empty session.
    pub fn new(
        detector: Arc<dyn SurfaceDetector>,
        recolorer: Arc<dyn WallRecolorer>,
        preprocessor: ImagePreprocessor,
        session_repository: Arc<dyn SessionRepository>,
        state_repository: Arc<dyn StateRepository>,
    ) -> Self {
        Self {
            session: Arc::new(RwLock::new(SimulatorSession::new(DEFAULT_SESSION_NAME))),
            detector,
            recolorer,
            preprocessor,
            session_repository,
            state_repository,
            original_uploads: Mutex::new(HashMap::new()),
        }
    }

    /// Wires the use case against the real backend and the platform config
    /// directory.
    ///
    /// Configuration comes from ~/.config/tinta/config.toml when present,
    /// falling back to defaults; sessions are stored in the same directory.
    pub fn from_default_environment() -> anyhow::Result<Self> {
        let config = match ConfigStorage::new() {
            Ok(storage) => storage.load_or_default(),
            Err(_) => SimulatorConfig::default(),
        };
        Ok(Self::new(
            Arc::new(SurfaceDetectionApiClient::from_config(&config)),
            Arc::new(WallRecolorApiClient::from_config(&config)),
            ImagePreprocessor::from_config(&config),
            Arc::new(JsonSessionRepository::default_location()?),
            Arc::new(FileStateRepository::default_location()?),
        ))
    }

    /// Returns a consistent snapshot of the session for rendering.
    pub async fn snapshot(&self) -> SimulatorSession {
        self.session.read().await.clone()
    }

    // ========================================================================
    // Rooms and analysis
    // ========================================================================

    /// Uploads a room photo and submits it for surface detection.
    ///
    /// The room appears immediately in the analyzing state, becomes the
    /// active room, and clears the wall selection. When detection answers,
    /// the outcome is applied by room id; a room removed in the meantime is
    /// left removed and the answer is dropped.
    pub async fn add_room(&self, bytes: &[u8]) -> Result<AnalysisReport> {
        let prepared = self.preprocessor.prepare(bytes)?;
        let data_url = prepared.data_url();

        let room_id = {
            let mut session = self.session.write().await;
            let room = Room::new(session.next_room_name(), data_url.clone());
            let room_id = room.id.clone();
            session.insert_room(room);
            session.touch();
            room_id
        };
        self.original_uploads
            .lock()
            .await
            .insert(room_id.clone(), Arc::new(bytes.to_vec()));
        self.persist().await;

        tracing::info!(room_id = %room_id, "room uploaded, starting surface detection");

        match self.detector.detect_surfaces(&data_url).await {
            Ok(detection) => {
                let applied = {
                    let mut session = self.session.write().await;
                    let applied =
                        session.apply_analysis_success(&room_id, detection.walls.clone());
                    if applied {
                        session.touch();
                    }
                    applied
                };
                if applied {
                    self.persist().await;
                } else {
                    tracing::debug!(room_id = %room_id, "detection result for removed room discarded");
                }

                if detection.walls.is_empty() {
                    Ok(AnalysisReport::NoWallsDetected)
                } else {
                    Ok(AnalysisReport::Analyzed {
                        wall_count: detection.walls.len(),
                    })
                }
            }
            Err(e) => {
                let applied = {
                    let mut session = self.session.write().await;
                    let applied = session.apply_analysis_failure(&room_id);
                    if applied {
                        session.touch();
                    }
                    applied
                };
                if applied {
                    self.persist().await;
                } else {
                    tracing::debug!(room_id = %room_id, "detection failure for removed room discarded");
                }
                Err(e)
            }
        }
    }

    /// Re-runs analysis for the active room.
    ///
    /// The room is discarded by identity and its pristine upload goes
    /// through the full upload path again, so the replacement carries a new
    /// room id; the old id never reappears.
    pub async fn retry_analysis(&self) -> Result<AnalysisReport> {
        let room_id = {
            let session = self.session.read().await;
            session
                .active_room_id
                .clone()
                .ok_or_else(|| TintaError::validation("No active room to re-analyze"))?
        };

        let bytes = self
            .original_uploads
            .lock()
            .await
            .get(&room_id)
            .cloned()
            .ok_or_else(|| {
                TintaError::validation("The original photo for this room is no longer available")
            })?;

        {
            let mut session = self.session.write().await;
            session.take_room(&room_id)?;
            session.touch();
        }
        self.original_uploads.lock().await.remove(&room_id);

        self.add_room(bytes.as_slice()).await
    }

    /// Makes a different room the active one.
    pub async fn select_room(&self, room_id: &str) -> Result<()> {
        {
            let mut session = self.session.write().await;
            session.select_room(room_id)?;
            session.touch();
        }
        self.persist().await;
        Ok(())
    }

    /// Removes a room from the session.
    pub async fn clear_room(&self, room_id: &str) -> Result<()> {
        {
            let mut session = self.session.write().await;
            session.clear_room(room_id)?;
            session.touch();
        }
        self.original_uploads.lock().await.remove(room_id);
        self.persist().await;
        Ok(())
    }

    // ========================================================================
    // Selection and painting
    // ========================================================================

    /// Selects a wall of the active room.
    pub async fn select_wall(&self, wall_id: &str) -> Result<()> {
        {
            let mut session = self.session.write().await;
            session.select_wall(wall_id)?;
            session.touch();
        }
        self.persist().await;
        Ok(())
    }

    /// Sets or clears the transient hover preview.
    pub async fn hover_wall(&self, wall_id: Option<String>) {
        self.session.write().await.hover_wall(wall_id);
    }

    /// Sets or clears the paint picked for the next apply.
    pub async fn select_paint(&self, paint: Option<Paint>) {
        self.session.write().await.select_paint(paint);
    }

    /// Paints the selected wall of the active room with the selected paint.
    ///
    /// Requires an active room, a selected wall, and a selected paint;
    /// anything missing is a validation error and nothing is mutated or
    /// sent. Only one paint operation may be in flight at a time. On
    /// failure the room keeps its previous image and simulations; only the
    /// in-flight status is cleared.
    pub async fn apply_color(&self) -> Result<()> {
        let (room_id, wall, paint, image_base64) = {
            let mut session = self.session.write().await;

            let room = session
                .active_room()
                .ok_or_else(|| TintaError::validation("No room selected"))?;
            let wall_id = session
                .selected_wall_id
                .clone()
                .ok_or_else(|| TintaError::validation("No wall selected"))?;
            let wall = room
                .wall(&wall_id)
                .cloned()
                .ok_or_else(|| TintaError::validation("Selected wall is not part of the room"))?;
            let paint = session
                .selected_paint
                .clone()
                .ok_or_else(|| TintaError::validation("No paint selected"))?;
            let room_id = room.id.clone();
            let image_base64 = room.image_url.clone();

            session.begin_painting()?;
            (room_id, wall, paint, image_base64)
        };

        tracing::info!(room_id = %room_id, wall = %wall.label, paint = %paint.hex, "painting wall");

        let request = RecolorRequest {
            image_base64,
            paint_hex: paint.hex.clone(),
            paint_name: paint.name.clone(),
            wall_label: wall.label.clone(),
        };

        match self.recolorer.recolor(request).await {
            Ok(result) => {
                let applied = {
                    let mut session = self.session.write().await;
                    session.finish_painting();
                    let applied =
                        session.apply_recolor(&room_id, &wall, paint, &result.image_url);
                    if applied {
                        session.touch();
                    }
                    applied
                };
                if applied {
                    self.persist().await;
                } else {
                    tracing::debug!(room_id = %room_id, "recolor result for removed room discarded");
                }
                Ok(())
            }
            Err(e) => {
                self.session.write().await.finish_painting();
                Err(e)
            }
        }
    }

    /// Removes a simulation from the active room.
    pub async fn remove_simulation(&self, simulation_id: &str) -> Result<()> {
        {
            let mut session = self.session.write().await;
            session.remove_simulation(simulation_id)?;
            session.touch();
        }
        self.persist().await;
        Ok(())
    }

    /// Points compare mode at a simulation of the active room, or back at
    /// the original upload.
    pub async fn set_compare_simulation(&self, simulation_id: Option<String>) -> Result<()> {
        {
            let mut session = self.session.write().await;
            session.set_compare_simulation(simulation_id)?;
            session.touch();
        }
        self.persist().await;
        Ok(())
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Starts a fresh session, replacing the current one in memory.
    pub async fn new_session(&self, name: impl Into<String>) -> Result<SimulatorSession> {
        let fresh = SimulatorSession::new(name);
        {
            let mut session = self.session.write().await;
            *session = fresh.clone();
        }
        self.original_uploads.lock().await.clear();

        self.session_repository
            .save(&fresh)
            .await
            .map_err(storage_error)?;
        self.state_repository
            .set_active_session(fresh.id.clone())
            .await
            .map_err(storage_error)?;
        Ok(fresh)
    }

    /// Saves the current session explicitly.
    pub async fn save(&self) -> Result<()> {
        let snapshot = {
            let mut session = self.session.write().await;
            session.touch();
            session.clone()
        };
        self.session_repository
            .save(&snapshot)
            .await
            .map_err(storage_error)
    }

    /// Loads a stored session and makes it the current one.
    pub async fn load_session(&self, session_id: &str) -> Result<SimulatorSession> {
        let mut loaded = self
            .session_repository
            .find_by_id(session_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| TintaError::not_found("session", session_id))?;

        // A stored session has no pending network calls.
        loaded.reset_in_flight();

        {
            let mut session = self.session.write().await;
            *session = loaded.clone();
        }
        self.original_uploads.lock().await.clear();

        self.state_repository
            .set_active_session(loaded.id.clone())
            .await
            .map_err(storage_error)?;
        Ok(loaded)
    }

    /// Resumes the most recently opened session, when one is recorded and
    /// still exists.
    pub async fn restore_last_session(&self) -> Result<Option<SimulatorSession>> {
        let Some(session_id) = self.state_repository.get_active_session().await else {
            return Ok(None);
        };
        match self
            .session_repository
            .find_by_id(&session_id)
            .await
            .map_err(storage_error)?
        {
            Some(mut loaded) => {
                loaded.reset_in_flight();
                {
                    let mut session = self.session.write().await;
                    *session = loaded.clone();
                }
                self.original_uploads.lock().await.clear();
                Ok(Some(loaded))
            }
            None => Ok(None),
        }
    }

    /// Lists stored sessions, most recently updated first.
    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        self.session_repository
            .list_summaries()
            .await
            .map_err(storage_error)
    }

    /// Renames the current session and persists it.
    pub async fn rename_session(&self, new_name: impl Into<String>) -> Result<()> {
        {
            let mut session = self.session.write().await;
            session.name = new_name.into();
            session.touch();
        }
        self.save().await
    }

    /// Deletes a stored session.
    ///
    /// When the deleted session was the "last opened" one, that pointer is
    /// cleared; when it is the session currently in memory, editing
    /// continues on a fresh session.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.session_repository
            .delete(session_id)
            .await
            .map_err(storage_error)?;

        if self.state_repository.get_active_session().await.as_deref() == Some(session_id) {
            self.state_repository
                .clear_active_session()
                .await
                .map_err(storage_error)?;
        }

        let is_current = { self.session.read().await.id == session_id };
        if is_current {
            let mut session = self.session.write().await;
            *session = SimulatorSession::new(DEFAULT_SESSION_NAME);
            drop(session);
            self.original_uploads.lock().await.clear();
        }
        Ok(())
    }

    /// Persists the current session, logging instead of failing: an
    /// auto-save problem must not undo a mutation that already happened.
    async fn persist(&self) {
        let snapshot = self.session.read().await.clone();
        if let Err(e) = self.session_repository.save(&snapshot).await {
            tracing::warn!(session_id = %snapshot.id, "failed to persist session: {e:#}");
        }
    }
}

fn storage_error(e: anyhow::Error) -> TintaError {
    TintaError::data_access(e.to_string())
}
