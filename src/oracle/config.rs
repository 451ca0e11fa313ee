//! Oracle client configuration.

use std::time::Duration;

use crate::config::Config;
use crate::constants::{
    DEFAULT_CRITIQUE_MODEL, DEFAULT_EMBED_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Decoding parameters for the generative critique model.
///
/// Values mirror what the consultant feature was tuned with: a small context
/// window, low temperature for focused output, nucleus + top-k sampling.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct GenerationOptions {
    pub num_ctx: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            num_ctx: 4096,
            temperature: 0.3,
            top_p: 0.9,
            top_k: 40,
        }
    }
}

/// Connection settings for the Ollama oracle.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,

    /// Model used for `/api/embed`.
    pub embed_model: String,

    /// Model used for `/api/generate`.
    pub critique_model: String,

    /// Per-call timeout applied at the HTTP client level.
    pub timeout: Duration,

    /// Sampling options sent with every generate call.
    pub options: GenerationOptions,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            critique_model: DEFAULT_CRITIQUE_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            options: GenerationOptions::default(),
        }
    }
}

impl OracleConfig {
    /// Builds an oracle config from the pipeline [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
            embed_model: config.embed_model.clone(),
            critique_model: config.critique_model.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            options: GenerationOptions::default(),
        }
    }
}
