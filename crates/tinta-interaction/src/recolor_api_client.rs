//! WallRecolorApiClient - REST client for the wall recolor service.
//!
//! Repaints one wall of a room image with a chosen paint. The wall is
//! addressed by its label at this boundary; resolving the selected wall id
//! to a label is the caller's job.

use crate::api_error::{classify_remote_failure, extract_error_message};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tinta_core::config::SimulatorConfig;
use tinta_core::error::{Result, TintaError};
use tinta_core::room::{RecolorRequest, RecolorResult, WallRecolorer};
use tinta_infrastructure::storage::ConfigStorage;

const RECOLOR_PATH: &str = "/api/simulator/paint-wall";
const SURFACE_TYPE: &str = "wall";

/// Client for the remote wall recolor endpoint.
#[derive(Clone)]
pub struct WallRecolorApiClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl WallRecolorApiClient {
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

        let base_url = std::env::var("TINTA_API_BASE_URL").map_err(|_| {
            TintaError::internal(
                "TINTA_API_BASE_URL not found in ~/.config/tinta/config.toml or environment variables",
            )
        })?;
        let api_token = std::env::var("TINTA_API_TOKEN").ok();
        Ok(Self::new(base_url, api_token))
    }

    async fn send_request(&self, body: &PaintWallRequest) -> Result<PaintWallResponse> {
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, RECOLOR_PATH))
            .json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| TintaError::remote(format!("Wall recolor request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read recolor error body".to_string());
            return Err(classify_remote_failure(
                Some(status.as_u16()),
                extract_error_message(&body_text),
            ));
        }

        response
            .json()
            .await
            .map_err(|err| TintaError::remote(format!("Failed to parse recolor response: {err}")))
    }
}

#[async_trait]
impl WallRecolorer for WallRecolorApiClient {
    async fn recolor(&self, request: RecolorRequest) -> Result<RecolorResult> {
        let body = PaintWallRequest {
            image_base64: request.image_base64,
            paint_color: request.paint_hex,
            paint_name: request.paint_name,
            wall_label: request.wall_label.clone(),
            surface_type: SURFACE_TYPE.to_string(),
        };

        let response = self.send_request(&body).await?;
        let result = map_response(response)?;

        tracing::info!(wall = %request.wall_label, "wall recolor completed");
        Ok(result)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaintWallRequest {
    image_base64: String,
    paint_color: String,
    paint_name: String,
    wall_label: String,
    surface_type: String,
}

#[derive(Deserialize)]
struct PaintWallResponse {
    #[serde(rename = "imageUrl", default)]
    image_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Maps a 2xx body into the domain outcome.
///
/// The recolor call succeeds or fails as a unit: a body without `imageUrl`
/// is a failure even under a 2xx status, so partial results never reach the
/// room.
fn map_response(response: PaintWallResponse) -> Result<RecolorResult> {
    if let Some(error) = response.error {
        return Err(classify_remote_failure(None, error));
    }
    match response.image_url {
        Some(image_url) => Ok(RecolorResult { image_url }),
        None => Err(TintaError::remote(
            "Recolor response did not include an image",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PaintWallResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_map_success() {
        let response = parse(r#"{"imageUrl":"https://cdn.example/out.jpg","creditsUsed":1}"#);
        let result = map_response(response).unwrap();
        assert_eq!(result.image_url, "https://cdn.example/out.jpg");
    }

    #[test]
    fn test_missing_image_url_fails_as_a_unit() {
        let response = parse(r#"{"status":"done"}"#);
        assert!(map_response(response).unwrap_err().is_remote());
    }

    #[test]
    fn test_error_field_wins_over_image() {
        let response = parse(
            r#"{"imageUrl":"https://cdn.example/out.jpg","error":"Insufficient AI credits."}"#,
        );
        assert!(map_response(response).unwrap_err().is_insufficient_credits());
    }

    #[test]
    fn test_request_wire_shape() {
        let body = PaintWallRequest {
            image_base64: "data:image/jpeg;base64,AAAA".to_string(),
            paint_color: "#50C878".to_string(),
            paint_name: "Verde Esmeralda".to_string(),
            wall_label: "Parede Norte".to_string(),
            surface_type: SURFACE_TYPE.to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["paintColor"], "#50C878");
        assert_eq!(json["wallLabel"], "Parede Norte");
        assert_eq!(json["surfaceType"], "wall");
        assert!(json["imageBase64"].as_str().unwrap().starts_with("data:"));
    }
}
