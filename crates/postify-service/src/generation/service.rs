//! Proxies prompts to the configured inference endpoint and returns JPEG bytes.

use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use tracing::{error, info, warn};

use postify_core::config::generation::GenerationConfig;
use postify_core::error::{AppError, ErrorKind};

/// Substring the upstream puts in its error body while the model warms up.
const MODEL_LOADING_MARKER: &str = "is currently loading";

const MODEL_LOADING_MESSAGE: &str = "Model is currently loading, please try again in a moment.";
const GENERATION_FAILED_MESSAGE: &str = "Failed to generate image";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Calls the upstream text-to-image model.
#[derive(Debug, Clone)]
pub struct ImageGenerationService {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ImageGenerationService {
    /// Creates the service with an HTTP client bounded by the configured timeout.
    pub fn new(config: &GenerationConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build image generation client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Generates an image for `prompt`.
    ///
    /// Errors: blank prompt → validation; upstream warming up → service
    /// unavailable; anything else → internal.
    pub async fn generate(&self, prompt: &str) -> Result<Bytes, AppError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::validation("Prompt is required"));
        }

        let response = self
            .client
            .post(&self.api_url)
            .header(reqwest::header::ACCEPT, "image/jpeg")
            .bearer_auth(&self.api_key)
            .json(&InferenceRequest { inputs: prompt })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Image generation request failed");
                AppError::with_source(ErrorKind::Internal, GENERATION_FAILED_MESSAGE, e)
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!(error = %e, "Failed to read image generation response");
            AppError::with_source(ErrorKind::Internal, GENERATION_FAILED_MESSAGE, e)
        })?;

        if status.is_success() {
            info!(bytes = body.len(), "Image generated");
            return Ok(body);
        }

        let text = String::from_utf8_lossy(&body);
        if text.contains(MODEL_LOADING_MARKER) {
            warn!(status = %status, "Image model is still loading");
            return Err(AppError::service_unavailable(MODEL_LOADING_MESSAGE));
        }

        error!(status = %status, body = %text, "Image generation upstream error");
        Err(AppError::internal(GENERATION_FAILED_MESSAGE))
    }
}
