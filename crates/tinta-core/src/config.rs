use serde::{Deserialize, Serialize};

/// Configuration for the simulator engine.
///
/// Loaded from `~/.config/tinta/config.toml` by the infrastructure layer,
/// with environment-variable fallback for the API settings.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulatorConfig {
    /// Base URL of the AI backend (surface detection and wall recolor).
    pub api_base_url: String,
    /// Access token sent as a bearer credential on every AI call.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Longest allowed image dimension after preprocessing, in pixels.
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,
    /// JPEG quality used when re-encoding uploads (1-100).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Background color painted under transparent pixels before encoding.
    #[serde(default = "default_background_rgb")]
    pub background_rgb: [u8; 3],
}

fn default_max_image_dimension() -> u32 {
    1280
}

fn default_jpeg_quality() -> u8 {
    85
}

fn default_background_rgb() -> [u8; 3] {
    [255, 255, 255]
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.tinta.app".to_string(),
            api_token: None,
            max_image_dimension: default_max_image_dimension(),
            jpeg_quality: default_jpeg_quality(),
            background_rgb: default_background_rgb(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: SimulatorConfig =
            toml::from_str("api_base_url = \"https://example.com\"").unwrap();
        assert_eq!(config.api_base_url, "https://example.com");
        assert_eq!(config.max_image_dimension, 1280);
        assert_eq!(config.jpeg_quality, 85);
        assert_eq!(config.background_rgb, [255, 255, 255]);
        assert!(config.api_token.is_none());
    }
}
