//! Image generation proxy configuration.

use serde::{Deserialize, Serialize};

/// Settings for the third-party text-to-image inference endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Full URL of the inference model endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer key sent as `Authorization: Bearer <key>`.
    #[serde(default)]
    pub api_key: String,
    /// Upstream request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0"
        .to_string()
}

fn default_timeout() -> u64 {
    60
}
