//! Canonical embedding vector type.
//!
//! Every vector that crosses a process boundary (oracle responses, corpus
//! files, adapter outputs) is normalized into [`Embedding`] exactly once, at
//! construction. Past that point the core treats vectors as opaque except for
//! cosine/inner-product operations.


use candle_core::{DType, Device, Tensor};
use thiserror::Error;

use crate::constants::COSINE_EPS;

/// Errors from embedding construction and vector arithmetic.
#[derive(Debug, Error)]
pub enum VectorError {
    /// The source produced a zero-length vector.
    #[error("embedding vector is empty")]
    Empty,

    /// A component was NaN or infinite.
    #[error("embedding vector contains a non-finite value at index {index}")]
    NonFinite { index: usize },

    /// Two vectors that must agree on length do not.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Tensor conversion failed.
    #[error("tensor conversion failed: {0}")]
    Tensor(#[from] candle_core::Error),
}

/// A fixed-length, immutable embedding vector.
///
/// Construct with [`Embedding::new`] (raw floats) or
/// [`Embedding::from_tensor`] (adapter output). Both validate; there is no
/// unchecked path.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// Validates and wraps a raw vector.
    ///
    /// Rejects empty vectors and non-finite components so that downstream
    /// cosine math never sees NaN.
    pub fn new(values: Vec<f32>) -> Result<Self, VectorError> {
        if values.is_empty() {
            return Err(VectorError::Empty);
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(VectorError::NonFinite { index });
        }
        Ok(Self(values))
    }

    /// Flattens a tensor of any shape into a single embedding.
    ///
    /// Used on adapter outputs, which arrive as `(1, dim)` batches.
    pub fn from_tensor(tensor: &Tensor) -> Result<Self, VectorError> {
        let values = tensor
            .flatten_all()?
            .to_dtype(DType::F32)?
            .to_vec1::<f32>()?;
        Self::new(values)
    }

    /// Number of components.
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Read-only view of the components.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Converts into a rank-1 tensor on `device`.
    pub fn to_tensor(&self, device: &Device) -> Result<Tensor, VectorError> {
        Ok(Tensor::from_slice(&self.0, self.0.len(), device)?)
    }

    /// Cosine similarity with `other`.
    ///
    /// Zero-norm inputs score `0.0` rather than dividing by zero. Lengths
    /// must agree; a mismatch is a hard error, never silently truncated.
    pub fn cosine_similarity(&self, other: &Self) -> Result<f32, VectorError> {
        if self.dim() != other.dim() {
            return Err(VectorError::DimensionMismatch {
                expected: self.dim(),
                actual: other.dim(),
            });
        }

        let mut dot = 0f64;
        let mut norm_a = 0f64;
        let mut norm_b = 0f64;
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            dot += f64::from(*a) * f64::from(*b);
            norm_a += f64::from(*a) * f64::from(*a);
            norm_b += f64::from(*b) * f64::from(*b);
        }

        let denom = norm_a.sqrt() * norm_b.sqrt();
        if denom < COSINE_EPS {
            return Ok(0.0);
        }
        Ok((dot / denom) as f32)
    }
}
