//! SurfaceDetectionApiClient - REST client for the surface analysis service.
//!
//! Sends a preprocessed room image to the AI backend and maps the response
//! into the domain's wall list. Configuration priority:
//! ~/.config/tinta/config.toml > environment variables.
//!
//! The service is idempotent per image content: the backend hashes the
//! payload and answers repeated uploads from a cache without consuming
//! credits. The client treats cached and fresh answers identically.

use crate::api_error::{classify_remote_failure, extract_error_message};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use tinta_core::config::SimulatorConfig;
use tinta_core::error::{Result, TintaError};
use tinta_core::room::{DetectedWall, SurfaceDetection, SurfaceDetector};
use tinta_infrastructure::storage::ConfigStorage;

const DETECT_PATH: &str = "/api/simulator/detect-surfaces";

/// Client for the remote surface detection endpoint.
#[derive(Clone)]
pub struct SurfaceDetectionApiClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl SurfaceDetectionApiClient {
    /// Creates a new client against the given backend base URL.
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_token,
        }
    }

    /// Creates a client from an already loaded configuration.
    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self::new(config.api_base_url.clone(), config.api_token.clone())
    }

    /// Loads configuration from ~/.config/tinta/config.toml or environment
    /// variables.
    ///
    /// Priority:
    /// 1. ~/.config/tinta/config.toml
    /// 2. Environment variables (TINTA_API_BASE_URL, TINTA_API_TOKEN)
    pub fn try_from_env() -> Result<Self> {
        if let Ok(storage) = ConfigStorage::new() {
            if let Ok(config) = storage.load() {
                return Ok(Self::from_config(&config));
            }
        }

        let base_url = env::var("TINTA_API_BASE_URL").map_err(|_| {
            TintaError::internal(
                "TINTA_API_BASE_URL not found in ~/.config/tinta/config.toml or environment variables",
            )
        })?;
        let api_token = env::var("TINTA_API_TOKEN").ok();
        Ok(Self::new(base_url, api_token))
    }

    async fn send_request(&self, body: &DetectSurfacesRequest) -> Result<DetectSurfacesResponse> {
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, DETECT_PATH))
            .json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|err| {
            TintaError::remote(format!("Surface detection request failed: {err}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read detection error body".to_string());
            return Err(classify_remote_failure(
                Some(status.as_u16()),
                extract_error_message(&body_text),
            ));
        }

        response.json().await.map_err(|err| {
            TintaError::remote(format!("Failed to parse detection response: {err}"))
        })
    }
}

#[async_trait]
impl SurfaceDetector for SurfaceDetectionApiClient {
    async fn detect_surfaces(&self, image_base64: &str) -> Result<SurfaceDetection> {
        let request = DetectSurfacesRequest {
            image_base64: image_base64.to_string(),
        };

        let response = self.send_request(&request).await?;
        let detection = map_response(response)?;

        tracing::info!(
            walls = detection.walls.len(),
            from_cache = detection.from_cache,
            "surface detection completed"
        );
        Ok(detection)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectSurfacesRequest {
    image_base64: String,
}

#[derive(Deserialize)]
struct DetectSurfacesResponse {
    #[serde(default)]
    walls: Vec<WallPayload>,
    #[serde(default)]
    sucesso: Option<bool>,
    #[serde(default)]
    total: Option<usize>,
    #[serde(rename = "fromCache", default)]
    from_cache: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct WallPayload {
    id: String,
    label: String,
    #[serde(rename = "mlLabel", default)]
    ml_label: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Maps a 2xx body into the domain outcome.
///
/// A body carrying an `error` field, or one flagged `sucesso: false`, is a
/// failure even under a 2xx status. Zero walls with a clean body is a valid
/// success.
fn map_response(response: DetectSurfacesResponse) -> Result<SurfaceDetection> {
    if let Some(error) = response.error {
        return Err(classify_remote_failure(None, error));
    }
    if response.sucesso == Some(false) {
        return Err(TintaError::remote(
            "Surface detection reported an unsuccessful result",
        ));
    }

    let walls: Vec<DetectedWall> = response
        .walls
        .into_iter()
        .map(|w| DetectedWall {
            id: w.id,
            label: w.label,
            ml_label: w.ml_label,
            description: w.description,
        })
        .collect();

    Ok(SurfaceDetection {
        total: response.total.unwrap_or(walls.len()),
        from_cache: response.from_cache.unwrap_or(false),
        walls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> DetectSurfacesResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_map_success_preserves_service_order() {
        let response = parse(
            r#"{"walls":[{"id":"s2","label":"Parede Sul"},{"id":"s1","label":"Parede Norte"}],"sucesso":true,"total":2}"#,
        );
        let detection = map_response(response).unwrap();
        assert_eq!(detection.walls.len(), 2);
        assert_eq!(detection.walls[0].id, "s2");
        assert_eq!(detection.total, 2);
        assert!(!detection.from_cache);
    }

    #[test]
    fn test_map_zero_walls_is_success() {
        let response = parse(r#"{"walls":[],"sucesso":true,"total":0}"#);
        let detection = map_response(response).unwrap();
        assert!(detection.walls.is_empty());
    }

    #[test]
    fn test_from_cache_flag_is_tolerated() {
        let response = parse(
            r#"{"walls":[{"id":"s1","label":"Parede Norte"}],"sucesso":true,"total":1,"fromCache":true}"#,
        );
        let detection = map_response(response).unwrap();
        assert!(detection.from_cache);
        assert_eq!(detection.walls.len(), 1);
    }

    #[test]
    fn test_error_field_fails_even_on_2xx_body() {
        let response = parse(r#"{"walls":[],"error":"Insufficient AI credits."}"#);
        let err = map_response(response).unwrap_err();
        assert!(err.is_insufficient_credits());
    }

    #[test]
    fn test_sucesso_false_is_a_failure() {
        let response = parse(r#"{"walls":[],"sucesso":false}"#);
        assert!(map_response(response).unwrap_err().is_remote());
    }

    #[test]
    fn test_optional_wall_fields() {
        let response = parse(
            r#"{"walls":[{"id":"s1","label":"Parede Norte","mlLabel":"wall_north","description":"Parede ao fundo"}],"sucesso":true,"total":1}"#,
        );
        let detection = map_response(response).unwrap();
        assert_eq!(detection.walls[0].ml_label.as_deref(), Some("wall_north"));
        assert_eq!(
            detection.walls[0].description.as_deref(),
            Some("Parede ao fundo")
        );
    }
}
