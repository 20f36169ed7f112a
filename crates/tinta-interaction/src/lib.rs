//! Remote-service clients and upload normalization for Tinta.
//!
//! This crate implements the AI-client traits declared in `tinta-core`
//! against the real HTTP backend, and provides the image preprocessor that
//! turns raw uploads into transport-ready payloads.

mod api_error;
mod detection_api_client;
mod preprocess;
mod recolor_api_client;

pub use detection_api_client::SurfaceDetectionApiClient;
pub use preprocess::{ImagePreprocessor, PreparedImage};
pub use recolor_api_client::WallRecolorApiClient;
