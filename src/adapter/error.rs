//! Adapter error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::vector::VectorError;

/// Errors from adapter construction, inference, and persistence.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Input vectors disagree with the configured dimension or each other.
    /// This is a fatal precondition, never silently padded or truncated.
    #[error("adapter dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Input tensors must be rank 1 (single example) or rank 2 (batch).
    #[error("adapter input must be rank 1 or 2, got rank {rank}")]
    InvalidRank { rank: usize },

    /// Batch sizes of the two inputs disagree.
    #[error("adapter batch mismatch: resume batch {resume}, job batch {job}")]
    BatchMismatch { resume: usize, job: usize },

    /// Invalid construction parameters.
    #[error("invalid adapter configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The weights blob could not be read or does not match the network.
    #[error("failed to load adapter weights from {path}: {reason}")]
    WeightsLoadFailed { path: PathBuf, reason: String },

    /// The weights blob could not be written.
    #[error("failed to save adapter weights to {path}: {reason}")]
    WeightsSaveFailed { path: PathBuf, reason: String },

    /// Underlying tensor operation failed.
    #[error("tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),

    /// Vector boundary conversion failed.
    #[error(transparent)]
    Vector(#[from] VectorError),
}
