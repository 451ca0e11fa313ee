//! Ollama-backed embedding and generation oracle.
//!
//! The oracle is an external black box: one text in, one fixed-length vector
//! (or one free-form completion) out. Failures are typed; callers never see
//! a zero vector or an error string on the success channel.
//!
//! Calls are sequential and blocking from the pipeline's point of view; each
//! carries the configured timeout and is not retried.

pub mod config;
pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use config::{GenerationOptions, OracleConfig};
pub use error::{OracleError, OracleResult};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockOracle;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::UNLOAD_TIMEOUT_SECS;
use crate::vector::Embedding;

/// Produces one embedding vector per text, or fails.
#[async_trait]
pub trait EmbeddingOracle: Send + Sync {
    /// Embeds a single text span.
    async fn embed(&self, text: &str) -> OracleResult<Embedding>;
}

/// Produces free-form critique text from a prompt, or fails.
#[async_trait]
pub trait CritiqueModel: Send + Sync {
    /// Runs the generative model with `system` instructions and `prompt`.
    async fn generate(&self, system: &str, prompt: &str) -> OracleResult<String>;

    /// Best-effort request to evict the embedding model from accelerator
    /// memory before a generate call. Errors are swallowed.
    async fn release_embedder(&self) {}
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
    // Evict after each call so the generative model fits alongside.
    keep_alive: u32,
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct LegacyEmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct LegacyEmbedResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerationOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Serialize)]
struct UnloadRequest<'a> {
    model: &'a str,
    keep_alive: u32,
}

/// HTTP client for a local Ollama server.
///
/// `/api/embed` is the primary embedding endpoint; servers old enough to 404
/// on it are retried once against the legacy `/api/embeddings` shape.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: HttpClient,
    config: OracleConfig,
}

impl OllamaClient {
    /// Creates a client with the per-call timeout baked into the HTTP client.
    pub fn new(config: OracleConfig) -> OracleResult<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OracleError::Request {
                reason: e.to_string(),
            })?;
        Ok(Self { http, config })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<B: Serialize>(&self, endpoint: &str, body: &B) -> OracleResult<(StatusCode, String)> {
        let response = self
            .http
            .post(endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout {
                        endpoint: endpoint.to_string(),
                    }
                } else {
                    OracleError::Request {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| OracleError::Request {
            reason: e.to_string(),
        })?;
        Ok((status, text))
    }

    async fn embed_legacy(&self, text: &str) -> OracleResult<Embedding> {
        let endpoint = self.endpoint("/api/embeddings");
        debug!(endpoint = %endpoint, "Falling back to legacy embeddings endpoint");

        let request = LegacyEmbedRequest {
            model: &self.config.embed_model,
            prompt: text,
        };
        let (status, body) = self.post_json(&endpoint, &request).await?;
        if !status.is_success() {
            return Err(OracleError::HttpStatus {
                endpoint,
                status: status.as_u16(),
            });
        }
        parse_legacy_embed_body(&body)
    }

    /// Best-effort `keep_alive: 0` poke that evicts `model` from memory.
    pub async fn force_unload(&self, model: &str) {
        let endpoint = self.endpoint("/api/generate");
        let request = UnloadRequest {
            model,
            keep_alive: 0,
        };

        let result = self
            .http
            .post(&endpoint)
            .timeout(Duration::from_secs(UNLOAD_TIMEOUT_SECS))
            .json(&request)
            .send()
            .await;

        if let Err(e) = result {
            debug!(model, error = %e, "Model unload poke failed (ignored)");
        }
    }

    /// Retired single-shot resume generation.
    ///
    /// The embedding-space pipeline replaced this path; it fails loudly
    /// instead of silently returning nothing.
    pub fn generate_resume(&self, _resume_json: &str, _job_description: &str) -> OracleResult<String> {
        Err(OracleError::Retired {
            method: "generate_resume",
        })
    }
}

#[async_trait]
impl EmbeddingOracle for OllamaClient {
    async fn embed(&self, text: &str) -> OracleResult<Embedding> {
        let endpoint = self.endpoint("/api/embed");
        let request = EmbedRequest {
            model: &self.config.embed_model,
            input: text,
            keep_alive: 0,
        };

        let (status, body) = self.post_json(&endpoint, &request).await?;

        if status == StatusCode::NOT_FOUND {
            return self.embed_legacy(text).await;
        }
        if !status.is_success() {
            return Err(OracleError::HttpStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        parse_embed_body(&body)
    }
}

#[async_trait]
impl CritiqueModel for OllamaClient {
    async fn generate(&self, system: &str, prompt: &str) -> OracleResult<String> {
        let endpoint = self.endpoint("/api/generate");
        let request = GenerateRequest {
            model: &self.config.critique_model,
            prompt,
            system,
            stream: false,
            options: self.config.options,
        };

        debug!(
            model = %self.config.critique_model,
            prompt_len = prompt.len(),
            "Requesting critique generation"
        );

        let (status, body) = self.post_json(&endpoint, &request).await?;
        if !status.is_success() {
            return Err(OracleError::HttpStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| OracleError::MalformedResponse {
                reason: e.to_string(),
            })?;

        let text = parsed.response.trim().to_string();
        if text.is_empty() {
            warn!("Generative model returned an empty completion");
        }
        Ok(text)
    }

    async fn release_embedder(&self) {
        self.force_unload(&self.config.embed_model).await;
    }
}

/// Decodes a `/api/embed` body into a canonical embedding.
///
/// An empty embedding list is a failure, never a zero vector.
fn parse_embed_body(body: &str) -> OracleResult<Embedding> {
    let parsed: EmbedResponse =
        serde_json::from_str(body).map_err(|e| OracleError::MalformedResponse {
            reason: e.to_string(),
        })?;

    let first = parsed
        .embeddings
        .into_iter()
        .next()
        .ok_or(OracleError::EmptyEmbedding)?;
    if first.is_empty() {
        return Err(OracleError::EmptyEmbedding);
    }

    Embedding::new(first).map_err(|e| OracleError::InvalidVector {
        reason: e.to_string(),
    })
}

/// Decodes a legacy `/api/embeddings` body.
fn parse_legacy_embed_body(body: &str) -> OracleResult<Embedding> {
    let parsed: LegacyEmbedResponse =
        serde_json::from_str(body).map_err(|e| OracleError::MalformedResponse {
            reason: e.to_string(),
        })?;

    if parsed.embedding.is_empty() {
        return Err(OracleError::EmptyEmbedding);
    }

    Embedding::new(parsed.embedding).map_err(|e| OracleError::InvalidVector {
        reason: e.to_string(),
    })
}
