//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `RESUMECRAFT_*` environment
//! variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CRITIQUE_MODEL, DEFAULT_EMBED_MODEL, DEFAULT_EMBEDDING_DIM,
    DEFAULT_EPOCHS, DEFAULT_HIDDEN_DIM, DEFAULT_LEARNING_RATE, DEFAULT_OLLAMA_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TOP_K,
};

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RESUMECRAFT_*` overrides on top of
/// defaults, then [`Config::validate`] before building the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the local Ollama server. Default: `http://localhost:11434`.
    pub ollama_url: String,

    /// Embedding model identifier. Default: `mxbai-embed-large`.
    pub embed_model: String,

    /// Generative model used for critiques. Default: `gemma:2b`.
    pub critique_model: String,

    /// Path to the trained adapter weights blob. Absence is non-fatal; the
    /// pipeline falls back to the untrained linear path.
    pub weights_path: PathBuf,

    /// Path to the training corpus (safetensors). Default: `./dataset_tensors.safetensors`.
    pub corpus_path: PathBuf,

    /// Embedding dimension D produced by the embed model. Default: `1024`.
    pub embedding_dim: usize,

    /// Hidden width of the adapter's learned path. Default: `2048`.
    pub hidden_dim: usize,

    /// Per-call timeout for oracle requests, in seconds. Default: `600`.
    pub request_timeout_secs: u64,

    /// Number of sentences the decoder selects. Default: `10`.
    pub top_k: usize,

    /// Training epochs. Default: `50`.
    pub epochs: usize,

    /// Training mini-batch size. Default: `16`.
    pub batch_size: usize,

    /// Optimizer learning rate. Default: `1e-4`.
    pub learning_rate: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            critique_model: DEFAULT_CRITIQUE_MODEL.to_string(),
            weights_path: PathBuf::from("./mlp_adapter.safetensors"),
            corpus_path: PathBuf::from("./dataset_tensors.safetensors"),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            hidden_dim: DEFAULT_HIDDEN_DIM,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            top_k: DEFAULT_TOP_K,
            epochs: DEFAULT_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }
}

impl Config {
    const ENV_OLLAMA_URL: &'static str = "RESUMECRAFT_OLLAMA_URL";
    const ENV_EMBED_MODEL: &'static str = "RESUMECRAFT_EMBED_MODEL";
    const ENV_CRITIQUE_MODEL: &'static str = "RESUMECRAFT_CRITIQUE_MODEL";
    const ENV_WEIGHTS_PATH: &'static str = "RESUMECRAFT_WEIGHTS_PATH";
    const ENV_CORPUS_PATH: &'static str = "RESUMECRAFT_CORPUS_PATH";
    const ENV_EMBEDDING_DIM: &'static str = "RESUMECRAFT_EMBEDDING_DIM";
    const ENV_HIDDEN_DIM: &'static str = "RESUMECRAFT_HIDDEN_DIM";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "RESUMECRAFT_REQUEST_TIMEOUT_SECS";
    const ENV_TOP_K: &'static str = "RESUMECRAFT_TOP_K";
    const ENV_EPOCHS: &'static str = "RESUMECRAFT_EPOCHS";
    const ENV_BATCH_SIZE: &'static str = "RESUMECRAFT_BATCH_SIZE";
    const ENV_LEARNING_RATE: &'static str = "RESUMECRAFT_LEARNING_RATE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            ollama_url: Self::parse_string_from_env(Self::ENV_OLLAMA_URL, defaults.ollama_url),
            embed_model: Self::parse_string_from_env(Self::ENV_EMBED_MODEL, defaults.embed_model),
            critique_model: Self::parse_string_from_env(
                Self::ENV_CRITIQUE_MODEL,
                defaults.critique_model,
            ),
            weights_path: Self::parse_path_from_env(Self::ENV_WEIGHTS_PATH, defaults.weights_path),
            corpus_path: Self::parse_path_from_env(Self::ENV_CORPUS_PATH, defaults.corpus_path),
            embedding_dim: Self::parse_usize_from_env(
                Self::ENV_EMBEDDING_DIM,
                defaults.embedding_dim,
            )?,
            hidden_dim: Self::parse_usize_from_env(Self::ENV_HIDDEN_DIM, defaults.hidden_dim)?,
            request_timeout_secs: Self::parse_u64_from_env(
                Self::ENV_REQUEST_TIMEOUT_SECS,
                defaults.request_timeout_secs,
            )?,
            top_k: Self::parse_usize_from_env(Self::ENV_TOP_K, defaults.top_k)?,
            epochs: Self::parse_usize_from_env(Self::ENV_EPOCHS, defaults.epochs)?,
            batch_size: Self::parse_usize_from_env(Self::ENV_BATCH_SIZE, defaults.batch_size)?,
            learning_rate: Self::parse_f64_from_env(
                Self::ENV_LEARNING_RATE,
                defaults.learning_rate,
            )?,
        })
    }

    /// Validates basic invariants (does not touch the filesystem beyond the
    /// weights path, whose absence is allowed).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ollama_url.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_OLLAMA_URL,
            });
        }
        if self.embed_model.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_EMBED_MODEL,
            });
        }
        if self.critique_model.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_CRITIQUE_MODEL,
            });
        }
        for (name, value) in [
            (Self::ENV_EMBEDDING_DIM, self.embedding_dim),
            (Self::ENV_HIDDEN_DIM, self.hidden_dim),
            (Self::ENV_TOP_K, self.top_k),
            (Self::ENV_EPOCHS, self.epochs),
            (Self::ENV_BATCH_SIZE, self.batch_size),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroValue { name });
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_REQUEST_TIMEOUT_SECS,
            });
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::InvalidLearningRate {
                value: self.learning_rate,
            });
        }

        // The weights blob is optional, but a directory at its path is a
        // misconfiguration, not a missing file.
        if self.weights_path.exists() && !self.weights_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.weights_path.clone(),
            });
        }

        Ok(())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|source| ConfigError::NumberParseError {
                name: var_name,
                value,
                source,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|source| ConfigError::NumberParseError {
                name: var_name,
                value,
                source,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_f64_from_env(var_name: &'static str, default: f64) -> Result<f64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|source| ConfigError::FloatParseError {
                name: var_name,
                value,
                source,
            }),
            Err(_) => Ok(default),
        }
    }
}
