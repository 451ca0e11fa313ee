//! Trainer error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::adapter::AdapterError;

/// Errors from corpus loading and training runs.
///
/// Corpus problems are configuration errors: they abort the run before the
/// first optimization step, and nothing is persisted.
#[derive(Debug, Error)]
pub enum TrainerError {
    /// The corpus file does not exist.
    #[error("training corpus not found at {path}; run the embedding preprocessor first")]
    CorpusNotFound { path: PathBuf },

    /// The corpus file exists but holds zero examples.
    #[error("training corpus is empty")]
    EmptyCorpus,

    /// The corpus file does not match the expected two-tensor schema.
    #[error("malformed training corpus: {reason}")]
    MalformedCorpus { reason: String },

    /// Invalid hyperparameters.
    #[error("invalid trainer configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Adapter construction or persistence failed.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Underlying tensor operation failed.
    #[error("tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),
}

/// Convenience result type for trainer operations.
pub type TrainerResult<T> = Result<T, TrainerError>;
