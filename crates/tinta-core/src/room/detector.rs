//! Surface detection client trait.
//!
//! Defines the interface the session layer uses to identify paintable
//! surfaces in a room photo. The HTTP implementation lives in the
//! interaction crate.

use super::model::DetectedWall;
use crate::error::Result;
use async_trait::async_trait;

/// A structurally successful detection response.
///
/// Zero walls is a valid success: the room is considered analyzed, and the
/// caller reports a "no walls" advisory rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceDetection {
    /// Walls in the order returned by the service; never reordered
    pub walls: Vec<DetectedWall>,
    /// Total surface count reported by the service
    pub total: usize,
    /// Whether the service answered from its content-addressed cache.
    /// Cached answers consumed no credits; behavior is otherwise identical.
    pub from_cache: bool,
}

/// An abstract client for the remote surface detection service.
///
/// # Contract
///
/// Implementations must surface three distinct outcomes:
/// - hard failure (transport, auth, credits, malformed payload) as a typed
///   error;
/// - success with zero qualifying walls as `Ok` with an empty list;
/// - success with one or more walls as `Ok` with the populated list.
///
/// Implementations must not retry automatically; a failed detection is
/// re-attempted only by an explicit caller-triggered retry.
#[async_trait]
pub trait SurfaceDetector: Send + Sync {
    /// Analyzes a preprocessed image payload (base64 or data URL).
    async fn detect_surfaces(&self, image_base64: &str) -> Result<SurfaceDetection>;
}
