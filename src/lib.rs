//! Resumecraft library crate (used by the CLI binary and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Runtime configuration
//! - [`Embedding`] - Validated dense vector
//! - [`TailorPipeline`], [`TailorReport`] - End-to-end orchestration
//!
//! ## Model & Training
//! - [`AdapterNetwork`], [`LoadedAdapter`], [`AdapterMode`] - Transform network
//! - [`Trainer`], [`TrainingCorpus`], [`TrainingSummary`] - Offline training
//!
//! ## Oracle & Decoding
//! - [`OllamaClient`], [`EmbeddingOracle`], [`CritiqueModel`] - Model service
//! - [`ExtractiveDecoder`] - Vector-to-text projection
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod adapter;
pub mod config;
pub mod constants;
pub mod critique;
pub mod decoder;
pub mod extract;
pub mod oracle;
pub mod pipeline;
pub mod trainer;
pub mod vector;

pub use adapter::{AdapterConfig, AdapterError, AdapterMode, AdapterNetwork, LoadedAdapter};
pub use config::{Config, ConfigError};
pub use decoder::{DecodeError, DecodeResult, ExtractiveDecoder};
pub use extract::{ExtractError, PlainTextExtractor, TextExtractor};
#[cfg(any(test, feature = "mock"))]
pub use oracle::MockOracle;
pub use oracle::{
    CritiqueModel, EmbeddingOracle, GenerationOptions, OllamaClient, OracleConfig, OracleError,
    OracleResult,
};
pub use pipeline::{PipelineError, TailorPipeline, TailorReport};
pub use trainer::{
    Trainer, TrainerConfig, TrainerError, TrainerResult, TrainingCorpus, TrainingSummary,
};
pub use vector::{Embedding, VectorError};
