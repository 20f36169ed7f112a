//! Upload normalization.
//!
//! Customer photos arrive in arbitrary formats and sizes. Before an image
//! is submitted to the AI backend it is bounded to a maximum dimension,
//! flattened onto an opaque background, and re-encoded as JPEG. Flattening
//! matters: JPEG has no alpha channel, and a transparent PNG encoded
//! naively shows up as black walls downstream.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use tinta_core::config::SimulatorConfig;
use tinta_core::error::{Result, TintaError};

/// A normalized, transport-ready upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    /// JPEG-encoded image bytes
    pub bytes: Vec<u8>,
    /// Width after bounding
    pub width: u32,
    /// Height after bounding
    pub height: u32,
}

impl PreparedImage {
    /// The payload form both AI endpoints accept.
    pub fn data_url(&self) -> String {
        format!(
            "data:image/jpeg;base64,{}",
            BASE64_STANDARD.encode(&self.bytes)
        )
    }
}

/// Normalizes uploaded images for the AI backend.
///
/// Deterministic: identical input bytes and options produce identical
/// output bytes.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    max_dimension: u32,
    jpeg_quality: u8,
    background: Rgb<u8>,
}

impl ImagePreprocessor {
    /// Creates a preprocessor with explicit options.
    pub fn new(max_dimension: u32, jpeg_quality: u8, background_rgb: [u8; 3]) -> Self {
        Self {
            max_dimension,
            jpeg_quality,
            background: Rgb(background_rgb),
        }
    }

    /// Creates a preprocessor from the simulator configuration.
    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self::new(
            config.max_image_dimension,
            config.jpeg_quality,
            config.background_rgb,
        )
    }

    /// Decodes, bounds, flattens, and re-encodes an uploaded image.
    ///
    /// The longest dimension is capped at `max_dimension`, preserving the
    /// aspect ratio; images already within bounds are never scaled up.
    pub fn prepare(&self, bytes: &[u8]) -> Result<PreparedImage> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| TintaError::image(format!("Failed to decode upload: {e}")))?;

        let (width, height) = (decoded.width(), decoded.height());
        let decoded = if width.max(height) > self.max_dimension {
            decoded.resize(self.max_dimension, self.max_dimension, FilterType::Lanczos3)
        } else {
            decoded
        };

        let flattened = self.flatten(&decoded.to_rgba8());
        let (width, height) = flattened.dimensions();

        let mut out = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut out, self.jpeg_quality);
        encoder
            .encode_image(&flattened)
            .map_err(|e| TintaError::image(format!("Failed to encode upload: {e}")))?;

        tracing::debug!(width, height, bytes = out.len(), "upload normalized");
        Ok(PreparedImage {
            bytes: out,
            width,
            height,
        })
    }

    /// Composites the image over the configured background color.
    fn flatten(&self, rgba: &image::RgbaImage) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(rgba.width(), rgba.height(), self.background);
        for (x, y, pixel) in rgba.enumerate_pixels() {
            let alpha = f32::from(pixel[3]) / 255.0;
            let blended = canvas.get_pixel_mut(x, y);
            for channel in 0..3 {
                let fg = f32::from(pixel[channel]);
                let bg = f32::from(blended[channel]);
                blended[channel] = (fg * alpha + bg * (1.0 - alpha)).round() as u8;
            }
        }
        canvas
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::from_config(&SimulatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_transparency_flattens_to_background_not_black() {
        let transparent = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0]));
        let prepared = ImagePreprocessor::default()
            .prepare(&png_bytes(&transparent))
            .unwrap();

        let decoded = image::load_from_memory(&prepared.bytes).unwrap().to_rgb8();
        let center = decoded.get_pixel(8, 8);
        // JPEG quantization shifts values slightly; near-white is enough.
        assert!(center[0] > 200 && center[1] > 200 && center[2] > 200);
    }

    #[test]
    fn test_longest_dimension_is_bounded_preserving_aspect() {
        let wide = RgbaImage::from_pixel(2000, 1000, Rgba([120, 120, 120, 255]));
        let prepared = ImagePreprocessor::default()
            .prepare(&png_bytes(&wide))
            .unwrap();
        assert_eq!((prepared.width, prepared.height), (1280, 640));
    }

    #[test]
    fn test_small_images_are_never_scaled_up() {
        let small = RgbaImage::from_pixel(320, 200, Rgba([120, 120, 120, 255]));
        let prepared = ImagePreprocessor::default()
            .prepare(&png_bytes(&small))
            .unwrap();
        assert_eq!((prepared.width, prepared.height), (320, 200));
    }

    #[test]
    fn test_output_is_deterministic() {
        let img = RgbaImage::from_fn(64, 48, |x, y| Rgba([x as u8, y as u8, 128, 255]));
        let input = png_bytes(&img);
        let preprocessor = ImagePreprocessor::default();
        assert_eq!(
            preprocessor.prepare(&input).unwrap(),
            preprocessor.prepare(&input).unwrap()
        );
    }

    #[test]
    fn test_data_url_shape() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let prepared = ImagePreprocessor::default()
            .prepare(&png_bytes(&img))
            .unwrap();
        assert!(prepared.data_url().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_undecodable_bytes_are_an_image_error() {
        let err = ImagePreprocessor::default()
            .prepare(b"definitely not an image")
            .unwrap_err();
        assert!(matches!(err, TintaError::Image(_)));
    }
}
