//! Wall recolor client trait.

use crate::error::Result;
use async_trait::async_trait;

/// Input for one recolor call.
///
/// The wall is identified by its *label* at the network boundary, not by
/// the internal wall id; the caller resolves the selected wall id to its
/// label before building this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecolorRequest {
    /// Current room image (base64 or data URL) the repaint starts from
    pub image_base64: String,
    /// Paint color in `#RRGGBB` form
    pub paint_hex: String,
    /// Paint display name, forwarded for rendering hints
    pub paint_name: String,
    /// Label of the surface to repaint
    pub wall_label: String,
}

/// A successful recolor response: a full image reflecting the repaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecolorResult {
    /// URL of the recolored image
    pub image_url: String,
}

/// An abstract client for the remote wall recolor service.
///
/// # Contract
///
/// Any failure, including a structurally valid 2xx response with no image
/// field, fails as a unit; partial results are never applied to the room.
/// No retry policy: failures surface synchronously so the operator can
/// re-attempt the paint.
#[async_trait]
pub trait WallRecolorer: Send + Sync {
    /// Repaints one wall of the given image with the given color.
    async fn recolor(&self, request: RecolorRequest) -> Result<RecolorResult>;
}
